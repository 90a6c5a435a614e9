//! # Surface rewriter
//!
//! Tree-to-tree normalizations applied to the source AST before translation.
//! Each rewrite replaces a construct the target language lacks with an
//! equivalent shape the translator handles uniformly: the power operator and
//! floor division become calls, tuple literals become factory calls, and the
//! legacy `print` statement becomes an ordinary call expression.

mod fold;

pub use self::fold::{walk_expr, walk_module, walk_stmt, Fold};

use crate::parser::ast::{Expr, Keyword, Module, Operator, Stmt};

/// Apply the default rewrites in their fixed order.
pub fn rewrite(module: Module) -> Module {
    let module = PowRewrite.fold_module(module);
    let module = FloorDivRewrite.fold_module(module);
    let module = TupleRewrite.fold_module(module);
    PrintRewrite.fold_module(module)
}

fn call(func: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call {
        func: Box::new(func),
        args,
        keywords: vec![],
        starargs: None,
        kwargs: None,
    }
}

fn math_pow(left: Expr, right: Expr) -> Expr {
    let func = Expr::Attribute {
        value: Box::new(Expr::Name("math".to_string())),
        attr: "pow".to_string(),
    };
    call(func, vec![left, right])
}

fn int_of_div(left: Expr, right: Expr) -> Expr {
    let div = Expr::BinOp {
        left: Box::new(left),
        op: Operator::Div,
        right: Box::new(right),
    };
    call(Expr::Name("int".to_string()), vec![div])
}

/// `x ** y` has no operator on the other side; it becomes `math.pow(x, y)`,
/// and `x **= y` decomposes into `x = math.pow(x, y)`.
pub struct PowRewrite;

impl Fold for PowRewrite {
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        match walk_expr(self, expr) {
            Expr::BinOp {
                left,
                op: Operator::Pow,
                right,
            } => math_pow(*left, *right),
            other => other,
        }
    }

    fn fold_stmt(&mut self, stmt: Stmt) -> Stmt {
        match walk_stmt(self, stmt) {
            Stmt::AugAssign {
                target,
                op: Operator::Pow,
                value,
            } => Stmt::Assign {
                targets: vec![target.clone()],
                value: math_pow(target, value),
            },
            other => other,
        }
    }
}

/// `x // y` becomes the truncating cast `int(x / y)`; augmented floor
/// division decomposes analogously.
pub struct FloorDivRewrite;

impl Fold for FloorDivRewrite {
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        match walk_expr(self, expr) {
            Expr::BinOp {
                left,
                op: Operator::FloorDiv,
                right,
            } => int_of_div(*left, *right),
            other => other,
        }
    }

    fn fold_stmt(&mut self, stmt: Stmt) -> Stmt {
        match walk_stmt(self, stmt) {
            Stmt::AugAssign {
                target,
                op: Operator::FloorDiv,
                value,
            } => Stmt::Assign {
                targets: vec![target.clone()],
                value: int_of_div(target, value),
            },
            other => other,
        }
    }
}

/// Tuple literals become `tuple(...)` factory calls; a hook later remaps the
/// callee to `std::make_tuple`.
pub struct TupleRewrite;

impl Fold for TupleRewrite {
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        match walk_expr(self, expr) {
            Expr::Tuple(elts) => call(Expr::Name("tuple".to_string()), elts),
            other => other,
        }
    }
}

/// The legacy `print` statement becomes an expression statement wrapping a
/// `print(...)` call; the no-newline form appends `end=""`.
pub struct PrintRewrite;

impl Fold for PrintRewrite {
    fn fold_stmt(&mut self, stmt: Stmt) -> Stmt {
        match walk_stmt(self, stmt) {
            Stmt::Print { values, newline } => {
                let mut keywords = vec![];
                if !newline {
                    keywords.push(Keyword {
                        name: "end".to_string(),
                        value: Expr::Str(String::new()),
                    });
                }
                Stmt::Expr(Expr::Call {
                    func: Box::new(Expr::Name("print".to_string())),
                    args: values,
                    keywords,
                    starargs: None,
                    kwargs: None,
                })
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::{self, ast::Number};

    fn rewrite_source(input: &str) -> Module {
        let tokens = Lexer::new(input).lex().unwrap();
        rewrite(parser::parse(tokens).unwrap())
    }

    #[test]
    fn test_pow_becomes_math_pow_call() {
        let module = rewrite_source("x ** 2");
        let Stmt::Expr(Expr::Call { func, args, .. }) = &module.body[0] else {
            panic!("expected a call");
        };
        assert_eq!(
            func.as_ref(),
            &Expr::Attribute {
                value: Box::new(Expr::Name("math".into())),
                attr: "pow".into(),
            }
        );
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_nested_pow_is_rewritten() {
        let module = rewrite_source("1 + x ** 2");
        let Stmt::Expr(Expr::BinOp { right, .. }) = &module.body[0] else {
            panic!("expected a binary expression");
        };
        assert!(matches!(right.as_ref(), Expr::Call { .. }));
    }

    #[test]
    fn test_aug_pow_decomposes_to_assignment() {
        let module = rewrite_source("x **= y");
        let Stmt::Assign { targets, value } = &module.body[0] else {
            panic!("expected an assignment");
        };
        assert_eq!(targets, &vec![Expr::Name("x".into())]);
        assert!(matches!(value, Expr::Call { .. }));
    }

    #[test]
    fn test_floordiv_becomes_int_of_div() {
        let module = rewrite_source("x // y");
        let Stmt::Expr(Expr::Call { func, args, .. }) = &module.body[0] else {
            panic!("expected a call");
        };
        assert_eq!(func.as_ref(), &Expr::Name("int".into()));
        assert!(matches!(
            args[0],
            Expr::BinOp {
                op: Operator::Div,
                ..
            }
        ));
    }

    #[test]
    fn test_tuple_becomes_factory_call() {
        let module = rewrite_source("(1, 2)");
        let Stmt::Expr(Expr::Call { func, args, .. }) = &module.body[0] else {
            panic!("expected a call");
        };
        assert_eq!(func.as_ref(), &Expr::Name("tuple".into()));
        assert_eq!(
            args,
            &vec![Expr::Num(Number::Int(1)), Expr::Num(Number::Int(2))]
        );
    }

    #[test]
    fn test_print_statement_becomes_call() {
        let module = rewrite_source("print 1,");
        let Stmt::Expr(Expr::Call { func, keywords, .. }) = &module.body[0] else {
            panic!("expected a call");
        };
        assert_eq!(func.as_ref(), &Expr::Name("print".into()));
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].name, "end");
        assert_eq!(keywords[0].value, Expr::Str(String::new()));
    }
}
