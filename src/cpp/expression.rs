use std::rc::Rc;

use super::{ArgumentsNode, BuildContext};
use crate::parser::ast::Number;

/// Expression nodes of the target tree.
#[derive(Debug, Clone)]
pub enum CppExpr {
    BoolOp {
        op: &'static str,
        values: Vec<CppExpr>,
    },
    BinOp {
        left: Box<CppExpr>,
        op: &'static str,
        right: Box<CppExpr>,
    },
    UnaryOp {
        op: &'static str,
        operand: Box<CppExpr>,
    },
    Lambda {
        args: Rc<ArgumentsNode>,
        body: Box<CppExpr>,
    },
    IfExp {
        test: Box<CppExpr>,
        body: Box<CppExpr>,
        orelse: Box<CppExpr>,
    },
    Compare {
        left: Box<CppExpr>,
        ops: Vec<&'static str>,
        comparators: Vec<CppExpr>,
    },
    Call {
        func: Box<CppExpr>,
        args: Vec<CppExpr>,
        keywords: Vec<CppKeyword>,
        starargs: Option<Box<CppExpr>>,
        kwargs: Option<Box<CppExpr>>,
    },
    Num(Number),
    Str(String),
    Boolean(bool),
    Name(String),
    Attribute {
        value: Box<CppExpr>,
        attr: String,
    },
    /// Namespace-scope access, written `value::attr` rather than `value.attr`.
    CppScope {
        value: Box<CppExpr>,
        attr: String,
    },
    Subscript {
        value: Box<CppExpr>,
        index: Box<CppExpr>,
    },
    /// A source expression with no translation; emits as a comment.
    Unsupported(String),
}

#[derive(Debug, Clone)]
pub struct CppKeyword {
    pub name: String,
    pub value: CppExpr,
}

impl CppExpr {
    pub fn build(&self, ctx: &BuildContext) -> String {
        match self {
            CppExpr::BoolOp { op, values } => {
                // nested boolean operands keep their grouping
                let parts = values
                    .iter()
                    .map(|value| {
                        if matches!(value, CppExpr::BoolOp { .. }) {
                            format!("({})", value.build(ctx))
                        } else {
                            value.build(ctx)
                        }
                    })
                    .collect::<Vec<_>>();
                parts.join(&format!(" {op} "))
            }
            CppExpr::BinOp { left, op, right } => {
                format!("{} {} {}", left.build(ctx), op, right.build(ctx))
            }
            CppExpr::UnaryOp { op, operand } => {
                let mut built = operand.build(ctx);
                if matches!(operand.as_ref(), CppExpr::BoolOp { .. }) {
                    built = format!("({built})");
                }
                format!("{op}{built}")
            }
            CppExpr::Lambda { args, body } => {
                format!(
                    "[&]({}) -> auto {{ return {}; }}",
                    args.build(ctx),
                    body.build(ctx)
                )
            }
            CppExpr::IfExp { test, body, orelse } => {
                format!(
                    "(({}) ? ({}) : ({}))",
                    test.build(ctx),
                    body.build(ctx),
                    orelse.build(ctx)
                )
            }
            CppExpr::Compare {
                left,
                ops,
                comparators,
            } => {
                let mut parts = vec![left.build(ctx)];
                for (op, comparator) in ops.iter().zip(comparators) {
                    parts.push(op.to_string());
                    parts.push(comparator.build(ctx));
                }
                parts.join(" ")
            }
            CppExpr::Call {
                func,
                args,
                keywords,
                ..
            } => {
                let mut parts = args.iter().map(|arg| arg.build(ctx)).collect::<Vec<_>>();
                parts.extend(keywords.iter().map(|keyword| keyword.build(ctx)));
                format!("{}({})", func.build(ctx), parts.join(", "))
            }
            CppExpr::Num(Number::Int(value)) => format!("{value}"),
            CppExpr::Num(Number::Float(value)) => format!("{value:?}"),
            CppExpr::Str(value) => format!("\"{}\"", value.replace('"', "\\\"")),
            CppExpr::Boolean(value) => (if *value { "true" } else { "false" }).to_string(),
            CppExpr::Name(name) => match name.as_str() {
                "True" => "true".to_string(),
                "False" => "false".to_string(),
                "None" => "nullptr".to_string(),
                _ => name.clone(),
            },
            CppExpr::Attribute { value, attr } => format!("{}.{}", value.build(ctx), attr),
            CppExpr::CppScope { value, attr } => format!("{}::{}", value.build(ctx), attr),
            CppExpr::Subscript { value, index } => {
                format!("{}[{}]", value.build(ctx), index.build(ctx))
            }
            CppExpr::Unsupported(kind) => format!("// UNSUPPORTED AST NODE: {kind}"),
        }
    }
}

impl CppKeyword {
    /// Known limitation inherited from the original tool: a call-site keyword
    /// argument emits as a declaration, not a call argument.
    pub fn build(&self, ctx: &BuildContext) -> String {
        format!("static const auto {} = {}", self.name, self.value.build(ctx))
    }
}
