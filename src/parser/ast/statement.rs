use super::{Arguments, Expr, Operator};

/// Statement nodes of the accepted Python subset.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    FunctionDef {
        name: String,
        args: Arguments,
        body: Vec<Stmt>,
        returns: Option<Expr>,
    },
    ClassDef {
        name: String,
        bases: Vec<Expr>,
        body: Vec<Stmt>,
    },
    Return(Option<Expr>),
    /// Chained assignment: `target_1 = target_2 = ... = value`.
    Assign {
        targets: Vec<Expr>,
        value: Expr,
    },
    AugAssign {
        target: Expr,
        op: Operator,
        value: Expr,
    },
    For {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    While {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    Raise(Option<Expr>),
    Expr(Expr),
    /// The legacy `print` statement. A trailing comma in the source clears
    /// `newline`.
    Print {
        values: Vec<Expr>,
        newline: bool,
    },
    Pass,
    Break,
    Continue,
    /// A construct the front end recognized but the pipeline does not
    /// translate (imports, try blocks, decorators, ...). Carries the node
    /// kind name for the emitted placeholder comment.
    Unsupported(&'static str),
}
