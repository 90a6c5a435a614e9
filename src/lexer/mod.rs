//! # Lexer
//!
//! Hand-written lexer for the Python subset. Besides the usual word, number,
//! string, and operator tokens it produces the layout tokens the parser
//! relies on: one `Newline` per logical line and `Indent`/`Dedent` pairs
//! computed from an indentation stack. Newlines inside brackets are
//! suppressed, `\` joins physical lines, and `#` comments and blank lines
//! vanish entirely.

mod token;

pub use self::token::*;

use std::{collections::HashMap, error::Error, fmt::Display, iter::Peekable, str::Chars};

use once_cell::sync::Lazy;
use unescape::unescape;

macro_rules! keyword {
    ($map:ident, $name:ident, $value:expr) => {
        $map.insert($value, TokenKind::$name);
    };
}

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut m = HashMap::new();

    keyword!(m, Def, "def");
    keyword!(m, Class, "class");
    keyword!(m, Return, "return");
    keyword!(m, If, "if");
    keyword!(m, Elif, "elif");
    keyword!(m, Else, "else");
    keyword!(m, While, "while");
    keyword!(m, For, "for");
    keyword!(m, In, "in");
    keyword!(m, Is, "is");
    keyword!(m, Raise, "raise");
    keyword!(m, Pass, "pass");
    keyword!(m, Break, "break");
    keyword!(m, Continue, "continue");
    keyword!(m, And, "and");
    keyword!(m, Or, "or");
    keyword!(m, Not, "not");
    keyword!(m, Lambda, "lambda");
    keyword!(m, Print, "print");
    keyword!(m, True, "True");
    keyword!(m, False, "False");
    keyword!(m, None, "None");
    keyword!(m, Import, "import");
    keyword!(m, From, "from");
    keyword!(m, Try, "try");
    keyword!(m, Except, "except");
    keyword!(m, Finally, "finally");
    keyword!(m, With, "with");
    keyword!(m, As, "as");
    keyword!(m, Global, "global");
    keyword!(m, Del, "del");
    keyword!(m, Assert, "assert");
    keyword!(m, Yield, "yield");

    m
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (line, col) = self.position;
        f.write_fmt(format_args!("{} ({}:{})", self.message, line, col))
    }
}

impl Error for LexError {}

pub type LexResult<T> = Result<T, LexError>;

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    tokens: Vec<Token>,
    iterator: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
    indents: Vec<usize>,
    depth: usize,
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: vec![],
            iterator: input.chars().peekable(),
            line: 1,
            col: 1,
            indents: vec![0],
            depth: 0,
            at_line_start: true,
        }
    }

    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        loop {
            if self.at_line_start && self.depth == 0 {
                if !self.lex_line_start()? {
                    break;
                }
            }

            self.eat_inline_whitespace();

            let position = (self.line, self.col);
            let Some(&next) = self.peek() else {
                if !self.at_line_start {
                    self.push(TokenKind::Newline, position);
                }
                break;
            };

            match next {
                '\n' => {
                    self.bump();
                    if self.depth == 0 {
                        self.push(TokenKind::Newline, position);
                        self.at_line_start = true;
                    }
                }
                '#' => self.eat_comment(),
                '\\' => {
                    self.bump();
                    if self.bump() != Some('\n') {
                        return Err(self.error("expected a line break after '\\'", position));
                    }
                }
                'a'..='z' | 'A'..='Z' | '_' => self.lex_word(),
                '0'..='9' => self.lex_number()?,
                '"' | '\'' => self.lex_string()?,
                _ => self.lex_operator()?,
            }
        }

        let position = (self.line, self.col);
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(TokenKind::Dedent, position);
        }

        Ok(self.tokens)
    }

    fn peek(&mut self) -> Option<&char> {
        self.iterator.peek()
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.iterator.next();
        match next {
            Some('\n') => {
                self.line += 1;
                self.col = 1;
            }
            Some(_) => self.col += 1,
            Option::None => {}
        }
        next
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(&expected) {
            self.bump();
            return true;
        }
        false
    }

    fn push(&mut self, kind: TokenKind, position: Position) {
        self.tokens.push(Token { kind, position });
    }

    fn error(&self, message: impl Into<String>, position: Position) -> LexError {
        LexError {
            message: message.into(),
            position,
        }
    }

    fn eat_inline_whitespace(&mut self) {
        while let Some(&c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn eat_comment(&mut self) {
        while let Some(&c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    /// Measure the indentation of the next non-blank line and emit
    /// `Indent`/`Dedent` tokens. Returns `false` once the input is exhausted.
    fn lex_line_start(&mut self) -> LexResult<bool> {
        loop {
            let mut width = 0usize;
            loop {
                match self.peek() {
                    Some(' ') => {
                        width += 1;
                        self.bump();
                    }
                    Some('\t') => {
                        width += 8 - (width % 8);
                        self.bump();
                    }
                    Some('\r') => {
                        self.bump();
                    }
                    _ => break,
                }
            }

            match self.peek() {
                Option::None => return Ok(false),
                Some('\n') => {
                    self.bump();
                }
                Some('#') => {
                    self.eat_comment();
                    self.bump();
                }
                _ => {
                    let position = (self.line, self.col);
                    let current = self.indents.last().copied().unwrap_or(0);

                    if width > current {
                        self.indents.push(width);
                        self.push(TokenKind::Indent, position);
                    } else if width < current {
                        while self.indents.last().copied().unwrap_or(0) > width {
                            self.indents.pop();
                            self.push(TokenKind::Dedent, position);
                        }
                        if self.indents.last().copied().unwrap_or(0) != width {
                            return Err(self.error(
                                "unindent does not match any outer indentation level",
                                position,
                            ));
                        }
                    }

                    self.at_line_start = false;
                    return Ok(true);
                }
            }
        }
    }

    fn lex_word(&mut self) {
        let position = (self.line, self.col);
        let mut stack = vec![];

        while let Some(&next) = self.peek() {
            if next.is_alphanumeric() || next == '_' {
                stack.push(next);
                self.bump();
            } else {
                break;
            }
        }

        let read = stack.iter().collect::<String>();

        match KEYWORDS.get(read.as_str()) {
            Some(kind) => self.push(kind.clone(), position),
            Option::None => self.push(TokenKind::Ident(read), position),
        }
    }

    fn lex_number(&mut self) -> LexResult<()> {
        let position = (self.line, self.col);
        let mut stack = vec![];
        let mut is_float = false;

        while let Some(&next) = self.peek() {
            match next {
                '0'..='9' => {
                    stack.push(next);
                    self.bump();
                }
                '.' if !is_float => {
                    is_float = true;
                    stack.push(next);
                    self.bump();
                }
                'e' | 'E' => {
                    is_float = true;
                    stack.push(next);
                    self.bump();
                    if let Some(&sign @ ('+' | '-')) = self.peek() {
                        stack.push(sign);
                        self.bump();
                    }
                }
                _ => break,
            }
        }

        let read = stack.iter().collect::<String>();

        let kind = if is_float {
            read.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| self.error(format!("failed to parse float literal '{read}'"), position))?
        } else {
            read.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| self.error(format!("failed to parse integer literal '{read}'"), position))?
        };

        self.push(kind, position);
        Ok(())
    }

    fn lex_string(&mut self) -> LexResult<()> {
        let position = (self.line, self.col);
        let Some(quote) = self.bump() else {
            return Err(self.error("unterminated string literal", position));
        };

        let mut raw = String::new();

        if self.eat(quote) {
            if !self.eat(quote) {
                // two quotes in a row: the empty string
                self.push(TokenKind::Str(String::new()), position);
                return Ok(());
            }

            // triple-quoted string, runs until three closing quotes
            loop {
                let Some(next) = self.bump() else {
                    return Err(self.error("unterminated string literal", position));
                };

                if next == quote && self.eat(quote) {
                    if self.eat(quote) {
                        break;
                    }
                    raw.push(next);
                    raw.push(quote);
                } else if next == '\\' {
                    raw.push(next);
                    if let Some(escaped) = self.bump() {
                        raw.push(escaped);
                    }
                } else {
                    raw.push(next);
                }
            }
        } else {
            loop {
                let Some(next) = self.bump() else {
                    return Err(self.error("unterminated string literal", position));
                };

                if next == quote {
                    break;
                }

                match next {
                    '\\' => {
                        raw.push(next);
                        if let Some(escaped) = self.bump() {
                            raw.push(escaped);
                        }
                    }
                    '\n' => return Err(self.error("unterminated string literal", position)),
                    _ => raw.push(next),
                }
            }
        }

        let Some(value) = unescape(&raw) else {
            return Err(self.error("invalid escape sequence in string literal", position));
        };

        self.push(TokenKind::Str(value), position);
        Ok(())
    }

    fn lex_operator(&mut self) -> LexResult<()> {
        let position = (self.line, self.col);
        let Some(next) = self.bump() else {
            return Ok(());
        };

        let kind = match next {
            '(' => {
                self.depth += 1;
                TokenKind::LParen
            }
            ')' => {
                self.depth = self.depth.saturating_sub(1);
                TokenKind::RParen
            }
            '[' => {
                self.depth += 1;
                TokenKind::LBracket
            }
            ']' => {
                self.depth = self.depth.saturating_sub(1);
                TokenKind::RBracket
            }
            '{' => {
                self.depth += 1;
                TokenKind::LBrace
            }
            '}' => {
                self.depth = self.depth.saturating_sub(1);
                TokenKind::RBrace
            }
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ';' => TokenKind::Semicolon,
            '@' => TokenKind::At,
            '~' => TokenKind::Tilde,
            '=' => {
                if self.eat('=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::NotEq
                } else {
                    return Err(self.error("failed to lex '!'", position));
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::Le
                } else if self.eat('<') {
                    if self.eat('=') {
                        TokenKind::LShiftAssign
                    } else {
                        TokenKind::LShift
                    }
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::Ge
                } else if self.eat('>') {
                    if self.eat('=') {
                        TokenKind::RShiftAssign
                    } else {
                        TokenKind::RShift
                    }
                } else {
                    TokenKind::Gt
                }
            }
            '+' => {
                if self.eat('=') {
                    TokenKind::PlusAssign
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.eat('>') {
                    TokenKind::Arrow
                } else if self.eat('=') {
                    TokenKind::MinusAssign
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.eat('*') {
                    if self.eat('=') {
                        TokenKind::DoubleStarAssign
                    } else {
                        TokenKind::DoubleStar
                    }
                } else if self.eat('=') {
                    TokenKind::StarAssign
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.eat('/') {
                    if self.eat('=') {
                        TokenKind::DoubleSlashAssign
                    } else {
                        TokenKind::DoubleSlash
                    }
                } else if self.eat('=') {
                    TokenKind::SlashAssign
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                if self.eat('=') {
                    TokenKind::PercentAssign
                } else {
                    TokenKind::Percent
                }
            }
            '&' => {
                if self.eat('=') {
                    TokenKind::AmpAssign
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.eat('=') {
                    TokenKind::PipeAssign
                } else {
                    TokenKind::Pipe
                }
            }
            '^' => {
                if self.eat('=') {
                    TokenKind::CaretAssign
                } else {
                    TokenKind::Caret
                }
            }
            other => {
                return Err(self.error(format!("failed to lex '{other}'"), position));
            }
        };

        self.push(kind, position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .lex()
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_lex_keywords_and_idents() {
        assert_eq!(
            kinds("def test"),
            vec![
                TokenKind::Def,
                TokenKind::Ident("test".into()),
                TokenKind::Newline
            ]
        );
    }

    #[test]
    fn test_lex_numbers() {
        assert_eq!(
            kinds("42 3.5"),
            vec![
                TokenKind::Int(42),
                TokenKind::Float(3.5),
                TokenKind::Newline
            ]
        );
    }

    #[test]
    fn test_lex_operators() {
        assert_eq!(
            kinds("x **= y // 2"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::DoubleStarAssign,
                TokenKind::Ident("y".into()),
                TokenKind::DoubleSlash,
                TokenKind::Int(2),
                TokenKind::Newline
            ]
        );
    }

    #[test]
    fn test_lex_string_escapes() {
        assert_eq!(
            kinds(r#""te\"st""#),
            vec![TokenKind::Str("te\"st".into()), TokenKind::Newline]
        );
    }

    #[test]
    fn test_lex_triple_quoted_string() {
        assert_eq!(
            kinds("\"\"\"doc\nstring\"\"\""),
            vec![TokenKind::Str("doc\nstring".into()), TokenKind::Newline]
        );
    }

    #[test]
    fn test_lex_indentation() {
        assert_eq!(
            kinds("if x:\n    pass\npass"),
            vec![
                TokenKind::If,
                TokenKind::Ident("x".into()),
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Pass,
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Pass,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_lex_newline_suppressed_in_brackets() {
        assert_eq!(
            kinds("f(a,\n  b)"),
            vec![
                TokenKind::Ident("f".into()),
                TokenKind::LParen,
                TokenKind::Ident("a".into()),
                TokenKind::Comma,
                TokenKind::Ident("b".into()),
                TokenKind::RParen,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_lex_blank_lines_and_comments() {
        assert_eq!(
            kinds("# leading comment\n\npass  # trailing\n"),
            vec![TokenKind::Pass, TokenKind::Newline]
        );
    }

    #[test]
    fn test_lex_inconsistent_dedent() {
        let result = Lexer::new("if x:\n        pass\n    pass\n").lex();
        assert!(result.is_err());
    }
}
