//! A rebuild-the-tree fold over the source AST. Rewriters override the
//! `fold_*` hooks and delegate to the `walk_*` functions for the recursion.

use crate::parser::ast::{Arguments, Expr, Keyword, Module, Stmt};

pub trait Fold {
    fn fold_module(&mut self, module: Module) -> Module {
        walk_module(self, module)
    }

    fn fold_stmt(&mut self, stmt: Stmt) -> Stmt {
        walk_stmt(self, stmt)
    }

    fn fold_expr(&mut self, expr: Expr) -> Expr {
        walk_expr(self, expr)
    }
}

pub fn walk_module<F: Fold + ?Sized>(folder: &mut F, module: Module) -> Module {
    Module {
        body: fold_body(folder, module.body),
    }
}

fn fold_body<F: Fold + ?Sized>(folder: &mut F, body: Vec<Stmt>) -> Vec<Stmt> {
    body.into_iter().map(|stmt| folder.fold_stmt(stmt)).collect()
}

fn fold_exprs<F: Fold + ?Sized>(folder: &mut F, exprs: Vec<Expr>) -> Vec<Expr> {
    exprs.into_iter().map(|expr| folder.fold_expr(expr)).collect()
}

fn fold_boxed<F: Fold + ?Sized>(folder: &mut F, expr: Box<Expr>) -> Box<Expr> {
    Box::new(folder.fold_expr(*expr))
}

fn fold_opt<F: Fold + ?Sized>(folder: &mut F, expr: Option<Expr>) -> Option<Expr> {
    expr.map(|expr| folder.fold_expr(expr))
}

fn fold_opt_boxed<F: Fold + ?Sized>(folder: &mut F, expr: Option<Box<Expr>>) -> Option<Box<Expr>> {
    expr.map(|expr| fold_boxed(folder, expr))
}

fn fold_arguments<F: Fold + ?Sized>(folder: &mut F, arguments: Arguments) -> Arguments {
    Arguments {
        args: arguments
            .args
            .into_iter()
            .map(|mut arg| {
                arg.annotation = fold_opt(folder, arg.annotation);
                arg
            })
            .collect(),
        vararg: arguments.vararg,
        kwarg: arguments.kwarg,
        defaults: fold_exprs(folder, arguments.defaults),
    }
}

pub fn walk_stmt<F: Fold + ?Sized>(folder: &mut F, stmt: Stmt) -> Stmt {
    match stmt {
        Stmt::FunctionDef {
            name,
            args,
            body,
            returns,
        } => Stmt::FunctionDef {
            name,
            args: fold_arguments(folder, args),
            body: fold_body(folder, body),
            returns: fold_opt(folder, returns),
        },
        Stmt::ClassDef { name, bases, body } => Stmt::ClassDef {
            name,
            bases: fold_exprs(folder, bases),
            body: fold_body(folder, body),
        },
        Stmt::Return(value) => Stmt::Return(fold_opt(folder, value)),
        Stmt::Assign { targets, value } => Stmt::Assign {
            targets: fold_exprs(folder, targets),
            value: folder.fold_expr(value),
        },
        Stmt::AugAssign { target, op, value } => Stmt::AugAssign {
            target: folder.fold_expr(target),
            op,
            value: folder.fold_expr(value),
        },
        Stmt::For {
            target,
            iter,
            body,
            orelse,
        } => Stmt::For {
            target: folder.fold_expr(target),
            iter: folder.fold_expr(iter),
            body: fold_body(folder, body),
            orelse: fold_body(folder, orelse),
        },
        Stmt::While { test, body, orelse } => Stmt::While {
            test: folder.fold_expr(test),
            body: fold_body(folder, body),
            orelse: fold_body(folder, orelse),
        },
        Stmt::If { test, body, orelse } => Stmt::If {
            test: folder.fold_expr(test),
            body: fold_body(folder, body),
            orelse: fold_body(folder, orelse),
        },
        Stmt::Raise(exc) => Stmt::Raise(fold_opt(folder, exc)),
        Stmt::Expr(expr) => Stmt::Expr(folder.fold_expr(expr)),
        Stmt::Print { values, newline } => Stmt::Print {
            values: fold_exprs(folder, values),
            newline,
        },
        Stmt::Pass | Stmt::Break | Stmt::Continue | Stmt::Unsupported(_) => stmt,
    }
}

pub fn walk_expr<F: Fold + ?Sized>(folder: &mut F, expr: Expr) -> Expr {
    match expr {
        Expr::BoolOp { op, values } => Expr::BoolOp {
            op,
            values: fold_exprs(folder, values),
        },
        Expr::BinOp { left, op, right } => Expr::BinOp {
            left: fold_boxed(folder, left),
            op,
            right: fold_boxed(folder, right),
        },
        Expr::UnaryOp { op, operand } => Expr::UnaryOp {
            op,
            operand: fold_boxed(folder, operand),
        },
        Expr::Lambda { args, body } => Expr::Lambda {
            args: fold_arguments(folder, args),
            body: fold_boxed(folder, body),
        },
        Expr::IfExp { test, body, orelse } => Expr::IfExp {
            test: fold_boxed(folder, test),
            body: fold_boxed(folder, body),
            orelse: fold_boxed(folder, orelse),
        },
        Expr::Compare {
            left,
            ops,
            comparators,
        } => Expr::Compare {
            left: fold_boxed(folder, left),
            ops,
            comparators: fold_exprs(folder, comparators),
        },
        Expr::Call {
            func,
            args,
            keywords,
            starargs,
            kwargs,
        } => Expr::Call {
            func: fold_boxed(folder, func),
            args: fold_exprs(folder, args),
            keywords: keywords
                .into_iter()
                .map(|keyword| Keyword {
                    name: keyword.name,
                    value: folder.fold_expr(keyword.value),
                })
                .collect(),
            starargs: fold_opt_boxed(folder, starargs),
            kwargs: fold_opt_boxed(folder, kwargs),
        },
        Expr::Attribute { value, attr } => Expr::Attribute {
            value: fold_boxed(folder, value),
            attr,
        },
        Expr::Subscript { value, index } => Expr::Subscript {
            value: fold_boxed(folder, value),
            index: fold_boxed(folder, index),
        },
        Expr::Slice { lower, upper, step } => Expr::Slice {
            lower: fold_opt_boxed(folder, lower),
            upper: fold_opt_boxed(folder, upper),
            step: fold_opt_boxed(folder, step),
        },
        Expr::Tuple(elts) => Expr::Tuple(fold_exprs(folder, elts)),
        Expr::List(elts) => Expr::List(fold_exprs(folder, elts)),
        Expr::Num(_) | Expr::Str(_) | Expr::Constant(_) | Expr::Name(_) => expr,
    }
}
