//! # Target AST
//!
//! The C++-side mirror of the source tree, enriched with target-specific
//! nodes (namespace-scope access, stream output, unsupported placeholders).
//! Every node exposes a single operation, `build(context) -> String`; parent
//! context travels through [`BuildContext`] instead of back-pointers, so the
//! tree stays parent-owns-children in one direction.

mod arguments;
mod context;
mod expression;
mod statement;

pub use self::arguments::*;
pub use self::context::*;
pub use self::expression::*;
pub use self::statement::*;

/// The translated compilation unit.
#[derive(Debug, Clone)]
pub struct Module {
    pub body: Vec<CppStmt>,
}

impl Module {
    /// Emit the unit, top-level declarations separated by blank lines.
    pub fn build<'a>(&'a self, ctx: &BuildContext<'a>) -> String {
        self.body
            .iter()
            .map(|stmt| stmt.build(ctx))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
