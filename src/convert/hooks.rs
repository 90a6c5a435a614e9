//! # Hook layer
//!
//! Post-visit pattern matchers consulted after each node is translated. A
//! hook pairs a predicate over the *source* node with a rewrite of the
//! translated *target* node. Hooks run in registration order; the first
//! match wins per node.

use std::rc::Rc;

use log::debug;

use crate::cpp::{CppExpr, CppStmt};
use crate::docstring;
use crate::parser::ast::{Constant, Expr, Stmt};
use crate::types::TypeRegistry;

pub trait Hook {
    fn match_stmt(&self, _node: &Stmt) -> bool {
        false
    }

    fn apply_stmt(&self, _node: &Stmt, ret: CppStmt) -> CppStmt {
        ret
    }

    fn match_expr(&self, _node: &Expr) -> bool {
        false
    }

    fn apply_expr(&self, _node: &Expr, ret: CppExpr) -> CppExpr {
        ret
    }
}

/// The hook set installed by a fresh [`crate::convert::Converter`].
pub fn default_hooks(registry: &Rc<TypeRegistry>) -> Vec<Box<dyn Hook>> {
    vec![
        Box::new(MathPowHook),
        Box::new(TupleFactoryHook),
        Box::new(RangeHook),
        Box::new(NoneLiteralHook),
        Box::new(PrintHook),
        Box::new(DocstringTypesHook {
            registry: Rc::clone(registry),
        }),
    ]
}

fn is_call_to_name(node: &Expr, name: &str) -> bool {
    let Expr::Call { func, .. } = node else {
        return false;
    };
    matches!(func.as_ref(), Expr::Name(id) if id == name)
}

fn scoped(value: &str, attr: &str) -> CppExpr {
    CppExpr::CppScope {
        value: Box::new(CppExpr::Name(value.to_string())),
        attr: attr.to_string(),
    }
}

fn replace_callee(ret: CppExpr, callee: CppExpr) -> CppExpr {
    match ret {
        CppExpr::Call {
            args,
            keywords,
            starargs,
            kwargs,
            ..
        } => CppExpr::Call {
            func: Box::new(callee),
            args,
            keywords,
            starargs,
            kwargs,
        },
        other => other,
    }
}

/// `math.pow(...)` becomes `std::pow(...)`.
pub struct MathPowHook;

impl Hook for MathPowHook {
    fn match_expr(&self, node: &Expr) -> bool {
        let Expr::Call { func, .. } = node else {
            return false;
        };
        let Expr::Attribute { value, attr } = func.as_ref() else {
            return false;
        };
        matches!(value.as_ref(), Expr::Name(id) if id == "math") && attr == "pow"
    }

    fn apply_expr(&self, _node: &Expr, ret: CppExpr) -> CppExpr {
        debug!("rewriting math.pow call to std::pow");
        replace_callee(ret, scoped("std", "pow"))
    }
}

/// `tuple(...)` becomes `std::make_tuple(...)`.
pub struct TupleFactoryHook;

impl Hook for TupleFactoryHook {
    fn match_expr(&self, node: &Expr) -> bool {
        is_call_to_name(node, "tuple")
    }

    fn apply_expr(&self, _node: &Expr, ret: CppExpr) -> CppExpr {
        replace_callee(ret, scoped("std", "make_tuple"))
    }
}

/// `range(...)` becomes `py2cpp::range(...)`, provided by the runtime
/// companion header.
pub struct RangeHook;

impl Hook for RangeHook {
    fn match_expr(&self, node: &Expr) -> bool {
        is_call_to_name(node, "range")
    }

    fn apply_expr(&self, _node: &Expr, ret: CppExpr) -> CppExpr {
        replace_callee(ret, scoped("py2cpp", "range"))
    }
}

/// The null literal becomes `nullptr`, whether it was parsed as a constant
/// or spelled as a bare name.
pub struct NoneLiteralHook;

impl Hook for NoneLiteralHook {
    fn match_expr(&self, node: &Expr) -> bool {
        matches!(node, Expr::Constant(Constant::None))
            || matches!(node, Expr::Name(id) if id == "None")
    }

    fn apply_expr(&self, _node: &Expr, _ret: CppExpr) -> CppExpr {
        CppExpr::Name("nullptr".to_string())
    }
}

/// An expression statement wrapping `print(...)` becomes a stream-output
/// statement.
pub struct PrintHook;

impl Hook for PrintHook {
    fn match_stmt(&self, node: &Stmt) -> bool {
        let Stmt::Expr(expr) = node else {
            return false;
        };
        is_call_to_name(expr, "print")
    }

    fn apply_stmt(&self, _node: &Stmt, ret: CppStmt) -> CppStmt {
        match ret {
            CppStmt::Expr(CppExpr::Call { args, .. }) => CppStmt::StdCout(args),
            other => other,
        }
    }
}

/// Writes `:param <type> <name>:` entries of a function's docstring into its
/// argument-type table, converted to their C++ spellings.
pub struct DocstringTypesHook {
    pub registry: Rc<TypeRegistry>,
}

impl Hook for DocstringTypesHook {
    fn match_stmt(&self, node: &Stmt) -> bool {
        matches!(node, Stmt::FunctionDef { .. })
    }

    fn apply_stmt(&self, _node: &Stmt, ret: CppStmt) -> CppStmt {
        let CppStmt::FunctionDef(function_def) = &ret else {
            return ret;
        };
        let Some(doc) = &function_def.docstring else {
            return ret;
        };

        for param in docstring::get_params(doc) {
            let Some(ty) = param.ty else {
                continue;
            };
            function_def
                .args
                .set_arg_type(&param.param, self.registry.detect(&ty, false));
        }
        ret
    }
}
