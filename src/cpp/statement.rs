use std::rc::Rc;

use super::{ArgumentsNode, BuildContext, CppExpr, Frame};
use crate::docstring;

/// Statement nodes of the target tree.
#[derive(Debug, Clone)]
pub enum CppStmt {
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Return(Option<CppExpr>),
    Assign {
        targets: Vec<CppExpr>,
        value: CppExpr,
    },
    AugAssign {
        target: CppExpr,
        op: &'static str,
        value: CppExpr,
    },
    For(For),
    While(While),
    If(If),
    Raise(Option<CppExpr>),
    Expr(CppExpr),
    /// Chained stream insertion: `std::cout << ... << std::endl;`.
    StdCout(Vec<CppExpr>),
    Pass,
    Break,
    Continue,
    /// A source statement with no translation; emits as a comment.
    Unsupported(String),
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub args: Rc<ArgumentsNode>,
    pub body: Vec<CppStmt>,
    pub docstring: Option<String>,
    pub returns: Option<CppExpr>,
}

#[derive(Debug, Clone)]
pub struct ClassDef {
    pub name: String,
    pub bases: Vec<CppExpr>,
    pub body: Vec<CppStmt>,
    pub docstring: Option<String>,
}

#[derive(Debug, Clone)]
pub struct For {
    pub target: CppExpr,
    pub iter: CppExpr,
    pub body: Vec<CppStmt>,
    pub orelse: Vec<CppStmt>,
}

#[derive(Debug, Clone)]
pub struct While {
    pub test: CppExpr,
    pub body: Vec<CppStmt>,
    pub orelse: Vec<CppStmt>,
}

#[derive(Debug, Clone)]
pub struct If {
    pub test: CppExpr,
    pub body: Vec<CppStmt>,
    pub orelse: Vec<CppStmt>,
}

impl CppStmt {
    pub fn build<'a>(&'a self, ctx: &BuildContext<'a>) -> String {
        match self {
            CppStmt::FunctionDef(function_def) => function_def.build(ctx),
            CppStmt::ClassDef(class_def) => class_def.build(ctx),
            CppStmt::Return(None) => format!("{}return;", ctx.indent()),
            CppStmt::Return(Some(value)) => {
                format!("{}return {};", ctx.indent(), value.build(ctx))
            }
            CppStmt::Assign { targets, value } => {
                let targets = targets
                    .iter()
                    .map(|target| target.build(ctx))
                    .collect::<Vec<_>>()
                    .join(" = ");
                format!("{}{} = {};", ctx.indent(), targets, value.build(ctx))
            }
            CppStmt::AugAssign { target, op, value } => {
                format!(
                    "{}{} {}= {};",
                    ctx.indent(),
                    target.build(ctx),
                    op,
                    value.build(ctx)
                )
            }
            CppStmt::For(for_stmt) => for_stmt.build(ctx),
            CppStmt::While(while_stmt) => while_stmt.build(ctx),
            CppStmt::If(if_stmt) => if_stmt.build(ctx),
            CppStmt::Raise(exc) => {
                // call arguments are dropped: the exception is always
                // default-constructed
                let name = match exc {
                    Some(CppExpr::Call { func, .. }) => func.build(ctx),
                    Some(other) => other.build(ctx),
                    None => return format!("{}throw;", ctx.indent()),
                };
                format!("{}throw {}();", ctx.indent(), name)
            }
            CppStmt::Expr(value) => format!("{}{};", ctx.indent(), value.build(ctx)),
            CppStmt::StdCout(args) => {
                let mut parts = vec!["std::cout".to_string()];
                parts.extend(args.iter().map(|arg| arg.build(ctx)));
                parts.push("std::endl".to_string());
                format!("{}{};", ctx.indent(), parts.join(" << "))
            }
            CppStmt::Pass => String::new(),
            CppStmt::Break => format!("{}break;", ctx.indent()),
            CppStmt::Continue => format!("{}continue;", ctx.indent()),
            CppStmt::Unsupported(kind) => format!("// UNSUPPORTED AST NODE: {kind}"),
        }
    }
}

impl FunctionDef {
    pub fn build<'a>(&'a self, ctx: &BuildContext<'a>) -> String {
        let new_ctx = ctx.child(Frame::Function(self));
        let body = self
            .body
            .iter()
            .map(|stmt| stmt.build(&new_ctx))
            .collect::<Vec<_>>();

        // constructor special case: `__init__` takes the class name and
        // loses its return type
        if self.name == "__init__" {
            if let Some(class_def) = ctx.enclosing_class() {
                return [
                    format!(
                        "{}{}({}) {{",
                        ctx.indent(),
                        class_def.name,
                        self.args.build(&new_ctx)
                    ),
                    body.join("\n"),
                    format!("{}}}", ctx.indent()),
                ]
                .join("\n");
            }
        }

        [
            format!(
                "{}{} {}({}) {{",
                ctx.indent(),
                self.rtype(ctx),
                self.name,
                self.args.build(&new_ctx)
            ),
            body.join("\n"),
            format!("{}}}", ctx.indent()),
        ]
        .join("\n")
    }

    /// Return type resolution: explicit annotation, then the docstring
    /// `:rtype:` field, else `void`.
    fn rtype(&self, ctx: &BuildContext) -> String {
        if let Some(returns) = &self.returns {
            return ctx.registry().detect(&returns.build(ctx), true);
        }

        let Some(doc) = &self.docstring else {
            return "void".to_string();
        };
        match docstring::get_rtype(doc) {
            Some(rtype) => ctx
                .registry()
                .detect_type_of(&docstring::parse_type_of(&rtype), true),
            None => "void".to_string(),
        }
    }
}

impl ClassDef {
    pub fn build<'a>(&'a self, ctx: &BuildContext<'a>) -> String {
        let new_ctx = ctx.child(Frame::Class(self));
        let body = self
            .body
            .iter()
            .map(|stmt| stmt.build(&new_ctx))
            .collect::<Vec<_>>();

        let bases = if self.bases.is_empty() {
            String::new()
        } else {
            format!(
                " : {}",
                self.bases
                    .iter()
                    .map(|base| format!("public {}", base.build(ctx)))
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };

        [
            format!("{}class {}{} {{", ctx.indent(), self.name, bases),
            body.join("\n"),
            format!("{}}};", ctx.indent()),
        ]
        .join("\n")
    }
}

impl For {
    pub fn build<'a>(&'a self, ctx: &BuildContext<'a>) -> String {
        let new_ctx = ctx.child(Frame::For(self));
        let body = self
            .body
            .iter()
            .map(|stmt| stmt.build(&new_ctx))
            .collect::<Vec<_>>();

        [
            format!(
                "{}for (auto {} : {}) {{",
                ctx.indent(),
                self.target.build(ctx),
                self.iter.build(ctx)
            ),
            body.join("\n"),
            format!("{}}}", ctx.indent()),
        ]
        .join("\n")
    }
}

impl While {
    pub fn build<'a>(&'a self, ctx: &BuildContext<'a>) -> String {
        let new_ctx = ctx.child(Frame::While(self));
        let body = self
            .body
            .iter()
            .map(|stmt| stmt.build(&new_ctx))
            .collect::<Vec<_>>();

        [
            format!("{}while ({}) {{", ctx.indent(), self.test.build(ctx)),
            body.join("\n"),
            format!("{}}}", ctx.indent()),
        ]
        .join("\n")
    }
}

impl If {
    pub fn build<'a>(&'a self, ctx: &BuildContext<'a>) -> String {
        let new_ctx = ctx.child(Frame::If(self));
        let body = self
            .body
            .iter()
            .map(|stmt| stmt.build(&new_ctx))
            .collect::<Vec<_>>();

        let mut result = vec![
            format!("{}if ({}) {{", ctx.indent(), self.test.build(ctx)),
            body.join("\n"),
            format!("{}}}", ctx.indent()),
        ];

        // a singleton `if` in the else branch flattens into an `else if`
        // chain
        if self.orelse.len() == 1 {
            if let CppStmt::If(inner) = &self.orelse[0] {
                let built = inner.build(ctx);
                let mut lines = built.split('\n');
                let first = lines.next().unwrap_or_default();
                result.truncate(result.len() - 1);
                result.push(format!("{}}} else {}", ctx.indent(), first.trim_start()));
                result.extend(lines.map(str::to_string));
                return result.join("\n");
            }
        }

        if !self.orelse.is_empty() {
            result.truncate(result.len() - 1);
            result.push(format!("{}}} else {{", ctx.indent()));
            result.extend(self.orelse.iter().map(|stmt| stmt.build(&new_ctx)));
            result.push(format!("{}}}", ctx.indent()));
        }

        result.join("\n")
    }
}
