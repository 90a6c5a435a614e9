//! # Parser
//!
//! Recursive descent parser over the token stream, producing the source AST.
//! Expression parsing follows the Python precedence ladder; statements
//! dispatch on their leading keyword. Constructs the pipeline does not
//! translate (imports, `try`, decorators, ...) are consumed together with
//! their suites and recorded as unsupported statements so that translation
//! can still emit a placeholder for them.

pub mod ast;

use std::{error::Error, fmt::Display};

use crate::lexer::{Position, Token, TokenKind};

use self::ast::{
    Arg, Arguments, BoolOpKind, CmpOp, Constant, Expr, Keyword, Module, Number, Operator, Stmt,
    UnaryOpKind,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: Option<Position>,
}

impl ParseError {
    pub fn eof(item: &str) -> ParseError {
        ParseError {
            message: format!("hit EOF while parsing {item}"),
            position: None,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some((line, col)) = self.position {
            f.write_fmt(format_args!("{} ({}:{})", self.message, line, col))
        } else {
            f.write_str(&self.message)
        }
    }
}

impl Error for ParseError {}

/// Parse a lexed token stream into a [`Module`].
pub fn parse(tokens: Vec<Token>) -> Result<Module, ParseError> {
    Parser::new(tokens).parse_module()
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.index).map(|token| &token.kind)
    }

    fn peek_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.index + offset).map(|token| &token.kind)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.index += 1;
            return true;
        }
        false
    }

    fn expect(&mut self, kind: &TokenKind, context: &str) -> Result<Token, ParseError> {
        match self.tokens.get(self.index).cloned() {
            Some(token) if token.kind == *kind => {
                self.index += 1;
                Ok(token)
            }
            Some(token) => Err(ParseError {
                message: format!(
                    "expected {:?} while parsing {context}, found {:?}",
                    kind, token.kind
                ),
                position: Some(token.position),
            }),
            None => Err(ParseError::eof(context)),
        }
    }

    fn expect_ident(&mut self, context: &str) -> Result<String, ParseError> {
        match self.tokens.get(self.index).cloned() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => {
                self.index += 1;
                Ok(name)
            }
            Some(token) => Err(ParseError {
                message: format!("expected an identifier while parsing {context}"),
                position: Some(token.position),
            }),
            None => Err(ParseError::eof(context)),
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            position: self.tokens.get(self.index).map(|token| token.position),
        }
    }

    fn at_stmt_end(&self) -> bool {
        matches!(
            self.peek(),
            Some(TokenKind::Newline | TokenKind::Semicolon) | None
        )
    }

    //
    // statements
    //

    fn parse_module(&mut self) -> Result<Module, ParseError> {
        let mut body = vec![];
        loop {
            while self.eat(&TokenKind::Newline) {}
            if self.peek().is_none() {
                break;
            }
            body.extend(self.parse_statement()?);
        }
        Ok(Module { body })
    }

    fn parse_statement(&mut self) -> Result<Vec<Stmt>, ParseError> {
        match self.peek() {
            Some(TokenKind::Def) => Ok(vec![self.parse_function_def()?]),
            Some(TokenKind::Class) => Ok(vec![self.parse_class_def()?]),
            Some(TokenKind::If) => Ok(vec![self.parse_if()?]),
            Some(TokenKind::While) => Ok(vec![self.parse_while()?]),
            Some(TokenKind::For) => Ok(vec![self.parse_for()?]),
            Some(TokenKind::At) => Ok(vec![self.parse_unsupported("Decorator")?]),
            Some(TokenKind::Try) => Ok(vec![self.parse_unsupported("Try")?]),
            Some(TokenKind::With) => Ok(vec![self.parse_unsupported("With")?]),
            Some(TokenKind::Import) => Ok(vec![self.parse_unsupported("Import")?]),
            Some(TokenKind::From) => Ok(vec![self.parse_unsupported("ImportFrom")?]),
            Some(TokenKind::Global) => Ok(vec![self.parse_unsupported("Global")?]),
            Some(TokenKind::Del) => Ok(vec![self.parse_unsupported("Delete")?]),
            Some(TokenKind::Assert) => Ok(vec![self.parse_unsupported("Assert")?]),
            Some(TokenKind::Yield) => Ok(vec![self.parse_unsupported("Yield")?]),
            Some(_) => self.parse_simple_line(),
            None => Err(ParseError::eof("statement")),
        }
    }

    /// Consume a construct the pipeline does not translate: the introducing
    /// logical line, its indented suite, and any sibling clauses
    /// (`except`/`else`/`finally`).
    fn parse_unsupported(&mut self, kind: &'static str) -> Result<Stmt, ParseError> {
        self.skip_logical_line();
        self.skip_block();

        while matches!(
            self.peek(),
            Some(TokenKind::Except | TokenKind::Finally | TokenKind::Else)
        ) {
            self.skip_logical_line();
            self.skip_block();
        }

        Ok(Stmt::Unsupported(kind))
    }

    fn skip_logical_line(&mut self) {
        while let Some(token) = self.next() {
            if token.kind == TokenKind::Newline {
                break;
            }
        }
    }

    fn skip_block(&mut self) {
        if self.peek() != Some(&TokenKind::Indent) {
            return;
        }
        let mut level = 0usize;
        while let Some(token) = self.next() {
            match token.kind {
                TokenKind::Indent => level += 1,
                TokenKind::Dedent => {
                    level -= 1;
                    if level == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    fn parse_function_def(&mut self) -> Result<Stmt, ParseError> {
        self.expect(&TokenKind::Def, "function definition")?;
        let name = self.expect_ident("function name")?;
        self.expect(&TokenKind::LParen, "parameter list")?;
        let args = self.parse_parameters()?;
        self.expect(&TokenKind::RParen, "parameter list")?;
        let returns = if self.eat(&TokenKind::Arrow) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let body = self.parse_suite("function body")?;
        Ok(Stmt::FunctionDef {
            name,
            args,
            body,
            returns,
        })
    }

    fn parse_parameters(&mut self) -> Result<Arguments, ParseError> {
        let mut args = vec![];
        let mut defaults = vec![];
        let mut vararg = None;
        let mut kwarg = None;

        loop {
            match self.peek() {
                Some(TokenKind::RParen) | None => break,
                Some(TokenKind::Star) => {
                    self.next();
                    if let Some(TokenKind::Ident(_)) = self.peek() {
                        vararg = Some(self.expect_ident("vararg name")?);
                    }
                }
                Some(TokenKind::DoubleStar) => {
                    self.next();
                    kwarg = Some(self.expect_ident("kwarg name")?);
                }
                _ => {
                    let name = self.expect_ident("parameter name")?;
                    let annotation = if self.eat(&TokenKind::Colon) {
                        Some(self.parse_expression()?)
                    } else {
                        None
                    };
                    args.push(Arg { name, annotation });
                    if self.eat(&TokenKind::Assign) {
                        defaults.push(self.parse_expression()?);
                    }
                }
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        Ok(Arguments {
            args,
            vararg,
            kwarg,
            defaults,
        })
    }

    fn parse_class_def(&mut self) -> Result<Stmt, ParseError> {
        self.expect(&TokenKind::Class, "class definition")?;
        let name = self.expect_ident("class name")?;

        let mut bases = vec![];
        if self.eat(&TokenKind::LParen) {
            while self.peek() != Some(&TokenKind::RParen) {
                bases.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RParen, "base class list")?;
        }

        let body = self.parse_suite("class body")?;
        Ok(Stmt::ClassDef { name, bases, body })
    }

    /// Parse `: NEWLINE INDENT stmt+ DEDENT`, or the inline form where the
    /// statements follow the colon on the same line.
    fn parse_suite(&mut self, context: &str) -> Result<Vec<Stmt>, ParseError> {
        self.expect(&TokenKind::Colon, context)?;

        if !self.eat(&TokenKind::Newline) {
            return self.parse_simple_line();
        }

        self.expect(&TokenKind::Indent, context)?;
        let mut body = vec![];
        loop {
            while self.eat(&TokenKind::Newline) {}
            if self.eat(&TokenKind::Dedent) || self.peek().is_none() {
                break;
            }
            body.extend(self.parse_statement()?);
        }
        Ok(body)
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.expect(&TokenKind::If, "if statement")?;
        let test = self.parse_expression()?;
        let body = self.parse_suite("if body")?;
        let orelse = self.parse_orelse()?;
        Ok(Stmt::If { test, body, orelse })
    }

    /// `elif` nests as a singleton `if` in the else branch, which is what the
    /// emitter later flattens back into an `else if` chain.
    fn parse_orelse(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if self.eat(&TokenKind::Elif) {
            let test = self.parse_expression()?;
            let body = self.parse_suite("elif body")?;
            let orelse = self.parse_orelse()?;
            Ok(vec![Stmt::If { test, body, orelse }])
        } else if self.eat(&TokenKind::Else) {
            self.parse_suite("else body")
        } else {
            Ok(vec![])
        }
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        self.expect(&TokenKind::While, "while statement")?;
        let test = self.parse_expression()?;
        let body = self.parse_suite("while body")?;
        let orelse = if self.eat(&TokenKind::Else) {
            self.parse_suite("while else body")?
        } else {
            vec![]
        };
        Ok(Stmt::While { test, body, orelse })
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        self.expect(&TokenKind::For, "for statement")?;
        let target = self.parse_target_list()?;
        self.expect(&TokenKind::In, "for statement")?;
        let iter = self.parse_expression_list()?;
        let body = self.parse_suite("for body")?;
        let orelse = if self.eat(&TokenKind::Else) {
            self.parse_suite("for else body")?
        } else {
            vec![]
        };
        Ok(Stmt::For {
            target,
            iter,
            body,
            orelse,
        })
    }

    fn parse_target_list(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_target()?;
        if self.peek() != Some(&TokenKind::Comma) {
            return Ok(first);
        }

        let mut elts = vec![first];
        while self.eat(&TokenKind::Comma) {
            if self.peek() == Some(&TokenKind::In) {
                break;
            }
            elts.push(self.parse_target()?);
        }
        Ok(Expr::Tuple(elts))
    }

    fn parse_target(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&TokenKind::LParen) {
            let inner = self.parse_target_list()?;
            self.expect(&TokenKind::RParen, "assignment target")?;
            return Ok(inner);
        }
        self.parse_postfix()
    }

    fn parse_simple_line(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = vec![self.parse_simple_stmt()?];
        while self.eat(&TokenKind::Semicolon) {
            if matches!(self.peek(), Some(TokenKind::Newline) | None) {
                break;
            }
            statements.push(self.parse_simple_stmt()?);
        }

        if !self.eat(&TokenKind::Newline) && self.peek().is_some() {
            return Err(self.error("expected end of line"));
        }
        Ok(statements)
    }

    fn parse_simple_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.peek() {
            Some(TokenKind::Return) => {
                self.next();
                if self.at_stmt_end() {
                    Ok(Stmt::Return(None))
                } else {
                    Ok(Stmt::Return(Some(self.parse_expression_list()?)))
                }
            }
            Some(TokenKind::Pass) => {
                self.next();
                Ok(Stmt::Pass)
            }
            Some(TokenKind::Break) => {
                self.next();
                Ok(Stmt::Break)
            }
            Some(TokenKind::Continue) => {
                self.next();
                Ok(Stmt::Continue)
            }
            Some(TokenKind::Raise) => {
                self.next();
                if self.at_stmt_end() {
                    Ok(Stmt::Raise(None))
                } else {
                    Ok(Stmt::Raise(Some(self.parse_expression()?)))
                }
            }
            Some(TokenKind::Print) if self.peek_at(1) != Some(&TokenKind::LParen) => {
                self.parse_print()
            }
            Some(_) => self.parse_expr_statement(),
            None => Err(ParseError::eof("statement")),
        }
    }

    /// The legacy `print` statement; a trailing comma suppresses the newline.
    fn parse_print(&mut self) -> Result<Stmt, ParseError> {
        self.expect(&TokenKind::Print, "print statement")?;
        let mut values = vec![];
        let mut newline = true;

        if !self.at_stmt_end() {
            loop {
                values.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
                if self.at_stmt_end() {
                    newline = false;
                    break;
                }
            }
        }

        Ok(Stmt::Print { values, newline })
    }

    fn parse_expr_statement(&mut self) -> Result<Stmt, ParseError> {
        let first = self.parse_expression_list()?;

        if self.peek() == Some(&TokenKind::Assign) {
            let mut targets = vec![first];
            loop {
                self.next();
                let value = self.parse_expression_list()?;
                if self.peek() == Some(&TokenKind::Assign) {
                    targets.push(value);
                } else {
                    return Ok(Stmt::Assign { targets, value });
                }
            }
        }

        if let Some(op) = self.peek().and_then(augmented_operator) {
            self.next();
            let value = self.parse_expression_list()?;
            return Ok(Stmt::AugAssign {
                target: first,
                op,
                value,
            });
        }

        Ok(Stmt::Expr(first))
    }

    //
    // expressions
    //

    /// An expression list: `expr (',' expr)* [',']`. More than one element
    /// (or a trailing comma) makes it a tuple.
    fn parse_expression_list(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_expression()?;
        if self.peek() != Some(&TokenKind::Comma) {
            return Ok(first);
        }

        let mut elts = vec![first];
        while self.eat(&TokenKind::Comma) {
            if !self.starts_expression() {
                break;
            }
            elts.push(self.parse_expression()?);
        }
        Ok(Expr::Tuple(elts))
    }

    fn starts_expression(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                TokenKind::Ident(_)
                    | TokenKind::Int(_)
                    | TokenKind::Float(_)
                    | TokenKind::Str(_)
                    | TokenKind::True
                    | TokenKind::False
                    | TokenKind::None
                    | TokenKind::Print
                    | TokenKind::LParen
                    | TokenKind::LBracket
                    | TokenKind::Lambda
                    | TokenKind::Not
                    | TokenKind::Plus
                    | TokenKind::Minus
                    | TokenKind::Tilde
            )
        )
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        if self.peek() == Some(&TokenKind::Lambda) {
            return self.parse_lambda();
        }

        let body = self.parse_or_test()?;
        if !self.eat(&TokenKind::If) {
            return Ok(body);
        }

        let test = self.parse_or_test()?;
        self.expect(&TokenKind::Else, "conditional expression")?;
        let orelse = self.parse_expression()?;
        Ok(Expr::IfExp {
            test: Box::new(test),
            body: Box::new(body),
            orelse: Box::new(orelse),
        })
    }

    fn parse_lambda(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::Lambda, "lambda expression")?;

        let mut args = vec![];
        let mut defaults = vec![];
        while let Some(TokenKind::Ident(_)) = self.peek() {
            let name = self.expect_ident("lambda parameter")?;
            args.push(Arg {
                name,
                annotation: None,
            });
            if self.eat(&TokenKind::Assign) {
                defaults.push(self.parse_expression()?);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::Colon, "lambda body")?;
        let body = self.parse_expression()?;
        Ok(Expr::Lambda {
            args: Arguments {
                args,
                vararg: None,
                kwarg: None,
                defaults,
            },
            body: Box::new(body),
        })
    }

    fn parse_or_test(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_and_test()?;
        if self.peek() != Some(&TokenKind::Or) {
            return Ok(first);
        }

        let mut values = vec![first];
        while self.eat(&TokenKind::Or) {
            values.push(self.parse_and_test()?);
        }
        Ok(Expr::BoolOp {
            op: BoolOpKind::Or,
            values,
        })
    }

    fn parse_and_test(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_not_test()?;
        if self.peek() != Some(&TokenKind::And) {
            return Ok(first);
        }

        let mut values = vec![first];
        while self.eat(&TokenKind::And) {
            values.push(self.parse_not_test()?);
        }
        Ok(Expr::BoolOp {
            op: BoolOpKind::And,
            values,
        })
    }

    fn parse_not_test(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&TokenKind::Not) {
            return Ok(Expr::UnaryOp {
                op: UnaryOpKind::Not,
                operand: Box::new(self.parse_not_test()?),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_bit_or()?;
        let mut ops = vec![];
        let mut comparators = vec![];

        loop {
            let op = if self.eat(&TokenKind::Is) {
                if self.eat(&TokenKind::Not) {
                    CmpOp::IsNot
                } else {
                    CmpOp::Is
                }
            } else if self.eat(&TokenKind::In) {
                CmpOp::In
            } else if self.peek() == Some(&TokenKind::Not)
                && self.peek_at(1) == Some(&TokenKind::In)
            {
                self.next();
                self.next();
                CmpOp::NotIn
            } else {
                let mapped = match self.peek() {
                    Some(TokenKind::Lt) => Some(CmpOp::Lt),
                    Some(TokenKind::Gt) => Some(CmpOp::Gt),
                    Some(TokenKind::Le) => Some(CmpOp::LtE),
                    Some(TokenKind::Ge) => Some(CmpOp::GtE),
                    Some(TokenKind::EqEq) => Some(CmpOp::Eq),
                    Some(TokenKind::NotEq) => Some(CmpOp::NotEq),
                    _ => None,
                };
                match mapped {
                    Some(op) => {
                        self.next();
                        op
                    }
                    None => break,
                }
            };

            ops.push(op);
            comparators.push(self.parse_bit_or()?);
        }

        if ops.is_empty() {
            Ok(left)
        } else {
            Ok(Expr::Compare {
                left: Box::new(left),
                ops,
                comparators,
            })
        }
    }

    fn parse_binary(
        &mut self,
        table: &[(TokenKind, Operator)],
        next: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        let mut left = next(self)?;
        'outer: loop {
            for (kind, op) in table {
                if self.peek() == Some(kind) {
                    self.next();
                    let right = next(self)?;
                    left = Expr::BinOp {
                        left: Box::new(left),
                        op: *op,
                        right: Box::new(right),
                    };
                    continue 'outer;
                }
            }
            break;
        }
        Ok(left)
    }

    fn parse_bit_or(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(&[(TokenKind::Pipe, Operator::BitOr)], Self::parse_bit_xor)
    }

    fn parse_bit_xor(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(&[(TokenKind::Caret, Operator::BitXor)], Self::parse_bit_and)
    }

    fn parse_bit_and(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(&[(TokenKind::Amp, Operator::BitAnd)], Self::parse_shift)
    }

    fn parse_shift(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(
            &[
                (TokenKind::LShift, Operator::LShift),
                (TokenKind::RShift, Operator::RShift),
            ],
            Self::parse_arith,
        )
    }

    fn parse_arith(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(
            &[
                (TokenKind::Plus, Operator::Add),
                (TokenKind::Minus, Operator::Sub),
            ],
            Self::parse_term,
        )
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(
            &[
                (TokenKind::Star, Operator::Mult),
                (TokenKind::Slash, Operator::Div),
                (TokenKind::DoubleSlash, Operator::FloorDiv),
                (TokenKind::Percent, Operator::Mod),
            ],
            Self::parse_factor,
        )
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Some(TokenKind::Plus) => Some(UnaryOpKind::UAdd),
            Some(TokenKind::Minus) => Some(UnaryOpKind::USub),
            Some(TokenKind::Tilde) => Some(UnaryOpKind::Invert),
            _ => None,
        };

        match op {
            Some(op) => {
                self.next();
                Ok(Expr::UnaryOp {
                    op,
                    operand: Box::new(self.parse_factor()?),
                })
            }
            None => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_postfix()?;
        if !self.eat(&TokenKind::DoubleStar) {
            return Ok(base);
        }

        // right-associative: the exponent may itself be a power
        let exponent = self.parse_factor()?;
        Ok(Expr::BinOp {
            left: Box::new(base),
            op: Operator::Pow,
            right: Box::new(exponent),
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut value = self.parse_atom()?;

        loop {
            if self.eat(&TokenKind::LParen) {
                value = self.parse_call(value)?;
            } else if self.eat(&TokenKind::Dot) {
                let attr = self.expect_ident("attribute name")?;
                value = Expr::Attribute {
                    value: Box::new(value),
                    attr,
                };
            } else if self.eat(&TokenKind::LBracket) {
                value = self.parse_subscript(value)?;
            } else {
                break;
            }
        }

        Ok(value)
    }

    fn parse_call(&mut self, func: Expr) -> Result<Expr, ParseError> {
        let mut args = vec![];
        let mut keywords = vec![];
        let mut starargs = None;
        let mut kwargs = None;

        loop {
            match self.peek() {
                Some(TokenKind::RParen) | None => break,
                Some(TokenKind::Star) => {
                    self.next();
                    starargs = Some(Box::new(self.parse_expression()?));
                }
                Some(TokenKind::DoubleStar) => {
                    self.next();
                    kwargs = Some(Box::new(self.parse_expression()?));
                }
                Some(TokenKind::Ident(_)) if self.peek_at(1) == Some(&TokenKind::Assign) => {
                    let name = self.expect_ident("keyword argument")?;
                    self.next();
                    keywords.push(Keyword {
                        name,
                        value: self.parse_expression()?,
                    });
                }
                _ => args.push(self.parse_expression()?),
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RParen, "call arguments")?;
        Ok(Expr::Call {
            func: Box::new(func),
            args,
            keywords,
            starargs,
            kwargs,
        })
    }

    fn parse_subscript(&mut self, value: Expr) -> Result<Expr, ParseError> {
        let lower = if self.peek() == Some(&TokenKind::Colon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        if self.eat(&TokenKind::Colon) {
            let upper = if matches!(self.peek(), Some(TokenKind::Colon | TokenKind::RBracket)) {
                None
            } else {
                Some(self.parse_expression()?)
            };
            let step = if self.eat(&TokenKind::Colon) {
                if self.peek() == Some(&TokenKind::RBracket) {
                    None
                } else {
                    Some(self.parse_expression()?)
                }
            } else {
                None
            };
            self.expect(&TokenKind::RBracket, "slice")?;
            return Ok(Expr::Subscript {
                value: Box::new(value),
                index: Box::new(Expr::Slice {
                    lower: lower.map(Box::new),
                    upper: upper.map(Box::new),
                    step: step.map(Box::new),
                }),
            });
        }

        self.expect(&TokenKind::RBracket, "subscript")?;
        let Some(index) = lower else {
            return Err(self.error("expected an index expression"));
        };
        Ok(Expr::Subscript {
            value: Box::new(value),
            index: Box::new(index),
        })
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.next() else {
            return Err(ParseError::eof("expression"));
        };

        match token.kind {
            TokenKind::Ident(name) => Ok(Expr::Name(name)),
            // `print` is a keyword to the lexer but an ordinary name in
            // expression position
            TokenKind::Print => Ok(Expr::Name("print".to_string())),
            TokenKind::Int(value) => Ok(Expr::Num(Number::Int(value))),
            TokenKind::Float(value) => Ok(Expr::Num(Number::Float(value))),
            TokenKind::Str(value) => Ok(Expr::Str(value)),
            TokenKind::True => Ok(Expr::Constant(Constant::True)),
            TokenKind::False => Ok(Expr::Constant(Constant::False)),
            TokenKind::None => Ok(Expr::Constant(Constant::None)),
            TokenKind::LParen => {
                if self.eat(&TokenKind::RParen) {
                    return Ok(Expr::Tuple(vec![]));
                }

                let first = self.parse_expression()?;
                if self.peek() != Some(&TokenKind::Comma) {
                    self.expect(&TokenKind::RParen, "parenthesized expression")?;
                    return Ok(first);
                }

                let mut elts = vec![first];
                while self.eat(&TokenKind::Comma) {
                    if self.peek() == Some(&TokenKind::RParen) {
                        break;
                    }
                    elts.push(self.parse_expression()?);
                }
                self.expect(&TokenKind::RParen, "tuple display")?;
                Ok(Expr::Tuple(elts))
            }
            TokenKind::LBracket => {
                let mut elts = vec![];
                while self.peek() != Some(&TokenKind::RBracket) {
                    elts.push(self.parse_expression()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RBracket, "list display")?;
                Ok(Expr::List(elts))
            }
            TokenKind::LBrace => Err(ParseError {
                message: "dict and set displays are not supported".to_string(),
                position: Some(token.position),
            }),
            other => Err(ParseError {
                message: format!("unexpected token {other:?} in expression"),
                position: Some(token.position),
            }),
        }
    }
}

fn augmented_operator(kind: &TokenKind) -> Option<Operator> {
    match kind {
        TokenKind::PlusAssign => Some(Operator::Add),
        TokenKind::MinusAssign => Some(Operator::Sub),
        TokenKind::StarAssign => Some(Operator::Mult),
        TokenKind::SlashAssign => Some(Operator::Div),
        TokenKind::PercentAssign => Some(Operator::Mod),
        TokenKind::DoubleStarAssign => Some(Operator::Pow),
        TokenKind::DoubleSlashAssign => Some(Operator::FloorDiv),
        TokenKind::LShiftAssign => Some(Operator::LShift),
        TokenKind::RShiftAssign => Some(Operator::RShift),
        TokenKind::AmpAssign => Some(Operator::BitAnd),
        TokenKind::PipeAssign => Some(Operator::BitOr),
        TokenKind::CaretAssign => Some(Operator::BitXor),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse_source(input: &str) -> Module {
        let tokens = Lexer::new(input).lex().unwrap();
        parse(tokens).unwrap()
    }

    #[test]
    fn test_parse_binary_precedence() {
        let module = parse_source("1 + 2 * 3");
        assert_eq!(
            module.body,
            vec![Stmt::Expr(Expr::BinOp {
                left: Box::new(Expr::Num(Number::Int(1))),
                op: Operator::Add,
                right: Box::new(Expr::BinOp {
                    left: Box::new(Expr::Num(Number::Int(2))),
                    op: Operator::Mult,
                    right: Box::new(Expr::Num(Number::Int(3))),
                }),
            })]
        );
    }

    #[test]
    fn test_parse_chained_comparison() {
        let module = parse_source("a < b <= c");
        assert_eq!(
            module.body,
            vec![Stmt::Expr(Expr::Compare {
                left: Box::new(Expr::Name("a".into())),
                ops: vec![CmpOp::Lt, CmpOp::LtE],
                comparators: vec![Expr::Name("b".into()), Expr::Name("c".into())],
            })]
        );
    }

    #[test]
    fn test_parse_bool_op_collapses() {
        let module = parse_source("a or b or c");
        assert_eq!(
            module.body,
            vec![Stmt::Expr(Expr::BoolOp {
                op: BoolOpKind::Or,
                values: vec![
                    Expr::Name("a".into()),
                    Expr::Name("b".into()),
                    Expr::Name("c".into())
                ],
            })]
        );
    }

    #[test]
    fn test_parse_power_is_right_associative() {
        let module = parse_source("a ** b ** c");
        let Stmt::Expr(Expr::BinOp { right, .. }) = &module.body[0] else {
            panic!("expected a binary expression");
        };
        assert!(matches!(
            right.as_ref(),
            Expr::BinOp {
                op: Operator::Pow,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_function_def() {
        let module = parse_source("def f(a: int, b=1):\n    pass\n");
        let Stmt::FunctionDef { name, args, body, .. } = &module.body[0] else {
            panic!("expected a function definition");
        };
        assert_eq!(name, "f");
        assert_eq!(args.args.len(), 2);
        assert_eq!(args.defaults.len(), 1);
        assert!(args.args[0].annotation.is_some());
        assert_eq!(body, &vec![Stmt::Pass]);
    }

    #[test]
    fn test_parse_elif_nests_into_orelse() {
        let module = parse_source("if a:\n    pass\nelif b:\n    pass\nelse:\n    pass\n");
        let Stmt::If { orelse, .. } = &module.body[0] else {
            panic!("expected an if statement");
        };
        assert_eq!(orelse.len(), 1);
        let Stmt::If { orelse: inner, .. } = &orelse[0] else {
            panic!("expected a nested if in the else branch");
        };
        assert_eq!(inner, &vec![Stmt::Pass]);
    }

    #[test]
    fn test_parse_chained_assignment() {
        let module = parse_source("a = b = c");
        assert_eq!(
            module.body,
            vec![Stmt::Assign {
                targets: vec![Expr::Name("a".into()), Expr::Name("b".into())],
                value: Expr::Name("c".into()),
            }]
        );
    }

    #[test]
    fn test_parse_augmented_assignment() {
        let module = parse_source("x **= 2");
        assert_eq!(
            module.body,
            vec![Stmt::AugAssign {
                target: Expr::Name("x".into()),
                op: Operator::Pow,
                value: Expr::Num(Number::Int(2)),
            }]
        );
    }

    #[test]
    fn test_parse_call_arguments() {
        let module = parse_source("f(a, key=1, *rest, **extra)");
        let Stmt::Expr(Expr::Call {
            args,
            keywords,
            starargs,
            kwargs,
            ..
        }) = &module.body[0]
        else {
            panic!("expected a call");
        };
        assert_eq!(args.len(), 1);
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].name, "key");
        assert!(starargs.is_some());
        assert!(kwargs.is_some());
    }

    #[test]
    fn test_parse_print_statement() {
        let module = parse_source("print 1, 2,");
        assert_eq!(
            module.body,
            vec![Stmt::Print {
                values: vec![Expr::Num(Number::Int(1)), Expr::Num(Number::Int(2))],
                newline: false,
            }]
        );
    }

    #[test]
    fn test_parse_print_call_is_expression() {
        let module = parse_source("print(1)");
        assert!(matches!(module.body[0], Stmt::Expr(Expr::Call { .. })));
    }

    #[test]
    fn test_parse_unsupported_statement_with_suite() {
        let module = parse_source("try:\n    pass\nexcept Exception:\n    pass\nx = 1\n");
        assert_eq!(module.body.len(), 2);
        assert_eq!(module.body[0], Stmt::Unsupported("Try"));
        assert!(matches!(module.body[1], Stmt::Assign { .. }));
    }

    #[test]
    fn test_parse_conditional_expression() {
        let module = parse_source("a if True else b");
        assert!(matches!(module.body[0], Stmt::Expr(Expr::IfExp { .. })));
    }

    #[test]
    fn test_parse_lambda_with_default() {
        let module = parse_source("lambda x, y=2: x + y");
        let Stmt::Expr(Expr::Lambda { args, .. }) = &module.body[0] else {
            panic!("expected a lambda");
        };
        assert_eq!(args.args.len(), 2);
        assert_eq!(args.defaults.len(), 1);
    }

    #[test]
    fn test_parse_slice_subscript() {
        let module = parse_source("a[1:2]");
        let Stmt::Expr(Expr::Subscript { index, .. }) = &module.body[0] else {
            panic!("expected a subscript");
        };
        assert!(matches!(index.as_ref(), Expr::Slice { .. }));
    }
}
