//! # Source AST
//!
//! In-memory representation of the Python subset the transpiler accepts. The
//! parser produces this tree, the surface rewriter rebuilds it, and the
//! translator consumes it.

mod expression;
mod statement;

pub use self::expression::*;
pub use self::statement::*;

/// A parsed source file: an ordered sequence of top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub body: Vec<Stmt>,
}

/// The formal parameter list of a function or lambda.
///
/// `defaults` right-aligns with `args`: a list of `n` defaults belongs to the
/// last `n` positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments {
    pub args: Vec<Arg>,
    pub vararg: Option<String>,
    pub kwarg: Option<String>,
    pub defaults: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub name: String,
    pub annotation: Option<Expr>,
}

/// A keyword argument at a call site.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: String,
    pub value: Expr,
}
