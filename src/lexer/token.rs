pub type Position = (usize, usize);

/// A single lexed token together with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

/// The token vocabulary of the Python subset.
///
/// `Indent`/`Dedent` are synthesized from the indentation stack; `Newline`
/// terminates a logical line and is suppressed inside brackets.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),

    Newline,
    Indent,
    Dedent,

    // keywords
    Def,
    Class,
    Return,
    If,
    Elif,
    Else,
    While,
    For,
    In,
    Is,
    Raise,
    Pass,
    Break,
    Continue,
    And,
    Or,
    Not,
    Lambda,
    Print,
    True,
    False,
    None,
    Import,
    From,
    Try,
    Except,
    Finally,
    With,
    As,
    Global,
    Del,
    Assert,
    Yield,

    // brackets and punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Colon,
    Comma,
    Dot,
    Semicolon,
    At,
    Arrow,

    // operators
    Assign,
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    LShift,
    RShift,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    NotEq,

    // augmented assignment
    PlusAssign,
    MinusAssign,
    StarAssign,
    DoubleStarAssign,
    SlashAssign,
    DoubleSlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    LShiftAssign,
    RShiftAssign,
}
