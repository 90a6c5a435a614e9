//! # Translator
//!
//! Visitor over the rewritten source AST that builds the parallel target
//! tree. Each node translates children-first; the hook layer is then
//! consulted and the first matching hook may replace the translated node.
//! Source constructs with no counterpart become unsupported placeholders
//! rather than aborting the pipeline; only internal inconsistencies (a power
//! operator surviving the surface rewriter) are fatal.

mod hooks;

pub use self::hooks::*;

use std::{error::Error, fmt::Display, rc::Rc};

use log::warn;

use crate::cpp::{self, ArgumentsNode, CppArg, CppExpr, CppKeyword, CppStmt};
use crate::parser::ast::{
    Arguments, BoolOpKind, CmpOp, Constant, Expr, Module, Operator, Stmt, UnaryOpKind,
};
use crate::transform;
use crate::types::TypeRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError {
    pub message: String,
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for ConvertError {}

pub struct Converter {
    registry: Rc<TypeRegistry>,
    hooks: Vec<Box<dyn Hook>>,
    /// Every translated parameter list, in visit order. Callers can install
    /// parameter types after translation through these handles.
    pub arguments: Vec<Rc<ArgumentsNode>>,
}

impl Converter {
    pub fn new(registry: Rc<TypeRegistry>) -> Self {
        let hooks = default_hooks(&registry);
        Self {
            registry,
            hooks,
            arguments: vec![],
        }
    }

    pub fn registry(&self) -> &Rc<TypeRegistry> {
        &self.registry
    }

    /// Translate a module: surface rewrites first, then the visit.
    pub fn convert_module(&mut self, module: Module) -> Result<cpp::Module, ConvertError> {
        let module = transform::rewrite(module);
        let body = module
            .body
            .iter()
            .map(|stmt| self.convert_stmt(stmt))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cpp::Module { body })
    }

    fn convert_stmt(&mut self, stmt: &Stmt) -> Result<CppStmt, ConvertError> {
        let ret = self.convert_stmt_inner(stmt)?;
        Ok(self.apply_stmt_hooks(stmt, ret))
    }

    fn convert_expr(&mut self, expr: &Expr) -> Result<CppExpr, ConvertError> {
        let ret = self.convert_expr_inner(expr)?;
        Ok(self.apply_expr_hooks(expr, ret))
    }

    fn apply_stmt_hooks(&self, node: &Stmt, ret: CppStmt) -> CppStmt {
        for hook in &self.hooks {
            if hook.match_stmt(node) {
                return hook.apply_stmt(node, ret);
            }
        }
        ret
    }

    fn apply_expr_hooks(&self, node: &Expr, ret: CppExpr) -> CppExpr {
        for hook in &self.hooks {
            if hook.match_expr(node) {
                return hook.apply_expr(node, ret);
            }
        }
        ret
    }

    fn convert_stmt_inner(&mut self, stmt: &Stmt) -> Result<CppStmt, ConvertError> {
        match stmt {
            Stmt::FunctionDef {
                name,
                args,
                body,
                returns,
            } => {
                let args = self.convert_arguments(args)?;
                let (docstring, rest) = split_docstring(body);
                let body = self.convert_body(rest)?;
                let returns = returns
                    .as_ref()
                    .map(|returns| self.convert_expr(returns))
                    .transpose()?;
                Ok(CppStmt::FunctionDef(cpp::FunctionDef {
                    name: name.clone(),
                    args,
                    body,
                    docstring,
                    returns,
                }))
            }
            Stmt::ClassDef { name, bases, body } => {
                let bases = bases
                    .iter()
                    .map(|base| self.convert_expr(base))
                    .collect::<Result<Vec<_>, _>>()?;
                let (docstring, rest) = split_docstring(body);
                let body = self.convert_body(rest)?;
                Ok(CppStmt::ClassDef(cpp::ClassDef {
                    name: name.clone(),
                    bases,
                    body,
                    docstring,
                }))
            }
            Stmt::Return(value) => Ok(CppStmt::Return(
                value
                    .as_ref()
                    .map(|value| self.convert_expr(value))
                    .transpose()?,
            )),
            Stmt::Assign { targets, value } => Ok(CppStmt::Assign {
                targets: targets
                    .iter()
                    .map(|target| self.convert_expr(target))
                    .collect::<Result<Vec<_>, _>>()?,
                value: self.convert_expr(value)?,
            }),
            Stmt::AugAssign { target, op, value } => Ok(CppStmt::AugAssign {
                target: self.convert_expr(target)?,
                op: operator_symbol(*op)?,
                value: self.convert_expr(value)?,
            }),
            Stmt::For {
                target,
                iter,
                body,
                orelse,
            } => Ok(CppStmt::For(cpp::For {
                target: self.convert_expr(target)?,
                iter: self.convert_expr(iter)?,
                body: self.convert_body(body)?,
                orelse: self.convert_body(orelse)?,
            })),
            Stmt::While { test, body, orelse } => Ok(CppStmt::While(cpp::While {
                test: self.convert_expr(test)?,
                body: self.convert_body(body)?,
                orelse: self.convert_body(orelse)?,
            })),
            Stmt::If { test, body, orelse } => Ok(CppStmt::If(cpp::If {
                test: self.convert_expr(test)?,
                body: self.convert_body(body)?,
                orelse: self.convert_body(orelse)?,
            })),
            Stmt::Raise(exc) => Ok(CppStmt::Raise(
                exc.as_ref().map(|exc| self.convert_expr(exc)).transpose()?,
            )),
            Stmt::Expr(expr) => Ok(CppStmt::Expr(self.convert_expr(expr)?)),
            Stmt::Print { .. } => {
                // normally rewritten away before translation
                warn!("unsupported statement: Print");
                Ok(CppStmt::Unsupported("Print".to_string()))
            }
            Stmt::Pass => Ok(CppStmt::Pass),
            Stmt::Break => Ok(CppStmt::Break),
            Stmt::Continue => Ok(CppStmt::Continue),
            Stmt::Unsupported(kind) => {
                warn!("unsupported statement: {kind}");
                Ok(CppStmt::Unsupported((*kind).to_string()))
            }
        }
    }

    fn convert_body(&mut self, body: &[Stmt]) -> Result<Vec<CppStmt>, ConvertError> {
        body.iter().map(|stmt| self.convert_stmt(stmt)).collect()
    }

    fn convert_expr_inner(&mut self, expr: &Expr) -> Result<CppExpr, ConvertError> {
        match expr {
            Expr::BoolOp { op, values } => Ok(CppExpr::BoolOp {
                op: boolop_symbol(*op),
                values: values
                    .iter()
                    .map(|value| self.convert_expr(value))
                    .collect::<Result<Vec<_>, _>>()?,
            }),
            Expr::BinOp { left, op, right } => Ok(CppExpr::BinOp {
                left: Box::new(self.convert_expr(left)?),
                op: operator_symbol(*op)?,
                right: Box::new(self.convert_expr(right)?),
            }),
            Expr::UnaryOp { op, operand } => Ok(CppExpr::UnaryOp {
                op: unaryop_symbol(*op),
                operand: Box::new(self.convert_expr(operand)?),
            }),
            Expr::Lambda { args, body } => {
                let args = self.convert_arguments(args)?;
                Ok(CppExpr::Lambda {
                    args,
                    body: Box::new(self.convert_expr(body)?),
                })
            }
            Expr::IfExp { test, body, orelse } => Ok(CppExpr::IfExp {
                test: Box::new(self.convert_expr(test)?),
                body: Box::new(self.convert_expr(body)?),
                orelse: Box::new(self.convert_expr(orelse)?),
            }),
            Expr::Compare {
                left,
                ops,
                comparators,
            } => {
                let mut symbols = vec![];
                for op in ops {
                    match cmp_symbol(*op) {
                        Some(symbol) => symbols.push(symbol),
                        None => {
                            warn!("unsupported comparison operator");
                            return Ok(CppExpr::Unsupported("Compare".to_string()));
                        }
                    }
                }
                Ok(CppExpr::Compare {
                    left: Box::new(self.convert_expr(left)?),
                    ops: symbols,
                    comparators: comparators
                        .iter()
                        .map(|comparator| self.convert_expr(comparator))
                        .collect::<Result<Vec<_>, _>>()?,
                })
            }
            Expr::Call {
                func,
                args,
                keywords,
                starargs,
                kwargs,
            } => Ok(CppExpr::Call {
                func: Box::new(self.convert_expr(func)?),
                args: args
                    .iter()
                    .map(|arg| self.convert_expr(arg))
                    .collect::<Result<Vec<_>, _>>()?,
                keywords: keywords
                    .iter()
                    .map(|keyword| {
                        Ok(CppKeyword {
                            name: keyword.name.clone(),
                            value: self.convert_expr(&keyword.value)?,
                        })
                    })
                    .collect::<Result<Vec<_>, ConvertError>>()?,
                starargs: starargs
                    .as_ref()
                    .map(|starargs| self.convert_expr(starargs).map(Box::new))
                    .transpose()?,
                kwargs: kwargs
                    .as_ref()
                    .map(|kwargs| self.convert_expr(kwargs).map(Box::new))
                    .transpose()?,
            }),
            Expr::Num(number) => Ok(CppExpr::Num(*number)),
            Expr::Str(value) => Ok(CppExpr::Str(value.clone())),
            Expr::Constant(Constant::True) => Ok(CppExpr::Boolean(true)),
            Expr::Constant(Constant::False) => Ok(CppExpr::Boolean(false)),
            // the none-literal hook rewrites this to `nullptr`
            Expr::Constant(Constant::None) => Ok(CppExpr::Name("None".to_string())),
            Expr::Attribute { value, attr } => Ok(CppExpr::Attribute {
                value: Box::new(self.convert_expr(value)?),
                attr: attr.clone(),
            }),
            Expr::Subscript { value, index } => {
                if matches!(index.as_ref(), Expr::Slice { .. }) {
                    warn!("unsupported node: Slice");
                    return Ok(CppExpr::Unsupported("Slice".to_string()));
                }
                Ok(CppExpr::Subscript {
                    value: Box::new(self.convert_expr(value)?),
                    index: Box::new(self.convert_expr(index)?),
                })
            }
            Expr::Slice { .. } => {
                warn!("unsupported node: Slice");
                Ok(CppExpr::Unsupported("Slice".to_string()))
            }
            Expr::Name(name) => Ok(CppExpr::Name(name.clone())),
            Expr::Tuple(_) | Expr::List(_) => {
                warn!("unsupported node: {}", expr.kind());
                Ok(CppExpr::Unsupported(expr.kind().to_string()))
            }
        }
    }

    fn convert_arguments(
        &mut self,
        arguments: &Arguments,
    ) -> Result<Rc<ArgumentsNode>, ConvertError> {
        let args = arguments
            .args
            .iter()
            .map(|arg| {
                Ok(CppArg {
                    name: arg.name.clone(),
                    annotation: arg
                        .annotation
                        .as_ref()
                        .map(|annotation| self.convert_expr(annotation))
                        .transpose()?,
                })
            })
            .collect::<Result<Vec<_>, ConvertError>>()?;
        let defaults = arguments
            .defaults
            .iter()
            .map(|default| self.convert_expr(default))
            .collect::<Result<Vec<_>, _>>()?;

        let node = Rc::new(ArgumentsNode::new(
            args,
            arguments.vararg.clone(),
            arguments.kwarg.clone(),
            defaults,
        ));
        self.arguments.push(Rc::clone(&node));
        Ok(node)
    }
}

/// The docstring is the leading string-literal statement of a function or
/// class body; it is lifted out of the translated body.
fn split_docstring(body: &[Stmt]) -> (Option<String>, &[Stmt]) {
    match body.first() {
        Some(Stmt::Expr(Expr::Str(doc))) => (Some(doc.clone()), &body[1..]),
        _ => (None, body),
    }
}

fn boolop_symbol(op: BoolOpKind) -> &'static str {
    match op {
        BoolOpKind::And => "&&",
        BoolOpKind::Or => "||",
    }
}

fn operator_symbol(op: Operator) -> Result<&'static str, ConvertError> {
    match op {
        Operator::Add => Ok("+"),
        Operator::Sub => Ok("-"),
        Operator::Mult => Ok("*"),
        Operator::Div => Ok("/"),
        Operator::Mod => Ok("%"),
        Operator::LShift => Ok("<<"),
        Operator::RShift => Ok(">>"),
        Operator::BitOr => Ok("|"),
        Operator::BitXor => Ok("^"),
        Operator::BitAnd => Ok("&"),
        Operator::Pow => Err(ConvertError {
            message: "power operator must be rewritten before translation".to_string(),
        }),
        Operator::FloorDiv => Err(ConvertError {
            message: "floor division must be rewritten before translation".to_string(),
        }),
    }
}

fn unaryop_symbol(op: UnaryOpKind) -> &'static str {
    match op {
        UnaryOpKind::Invert => "~",
        UnaryOpKind::Not => "!",
        UnaryOpKind::UAdd => "+",
        UnaryOpKind::USub => "-",
    }
}

fn cmp_symbol(op: CmpOp) -> Option<&'static str> {
    match op {
        CmpOp::Eq => Some("=="),
        CmpOp::NotEq => Some("!="),
        CmpOp::Lt => Some("<"),
        CmpOp::LtE => Some("<="),
        CmpOp::Gt => Some(">"),
        CmpOp::GtE => Some(">="),
        CmpOp::Is | CmpOp::IsNot | CmpOp::In | CmpOp::NotIn => None,
    }
}
