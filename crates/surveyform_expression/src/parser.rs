//! Parser for survey logic expressions.
//!
//! A recursive-descent parser over the XPath subset surveys use:
//!
//! ```text
//! or       := and ('or' and)*
//! and      := equality ('and' equality)*
//! equality := relation (('=' | '!=') relation)*
//! relation := additive (('<' | '<=' | '>' | '>=') additive)*
//! additive := multiply (('+' | '-') multiply)*
//! multiply := unary (('*' | 'div' | 'mod') unary)*
//! unary    := '-' unary | union
//! union    := primary ('|' primary)*
//! primary  := number | string | reference | path | call | '(' or ')'
//! ```
//!
//! Calls are checked against the restricted function set and its arities.

use surveyform_foundation::{Error, Result};

use crate::ast::{BinaryOp, Expr};
use crate::functions;
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parser for expression source text.
pub struct Parser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
    /// Source text (for error messages).
    source: &'src str,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            source,
        }
    }

    /// Parses the whole source as one expression.
    ///
    /// # Errors
    /// Returns an `ExpressionSyntax` error if the source is empty, malformed,
    /// calls a function outside the allowed set, or has trailing input.
    pub fn parse(&mut self) -> Result<Expr> {
        if self.current.kind == TokenKind::Eof {
            return Err(self.error("empty expression"));
        }
        let expr = self.parse_or()?;
        if self.current.kind != TokenKind::Eof {
            return Err(self.error(&format!("unexpected {}", self.current.kind.name())));
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_and()?;
        while self.current.kind.is_keyword("or") {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_equality()?;
        while self.current.kind.is_keyword("and") {
            self.advance();
            let rhs = self.parse_equality()?;
            lhs = binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_relation()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Eq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_relation()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_relation(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_additive()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_multiply()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_multiply()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_multiply(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match &self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                kind if kind.is_keyword("div") => BinaryOp::Div,
                kind if kind.is_keyword("mod") => BinaryOp::Mod,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.current.kind == TokenKind::Minus {
            let start = self.current.span;
            self.advance();
            let inner = self.parse_unary()?;
            let span = start.to(inner.span());
            return Ok(Expr::Negate(Box::new(inner), span));
        }
        self.parse_union()
    }

    fn parse_union(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_primary()?;
        while self.current.kind == TokenKind::Pipe {
            self.advance();
            let rhs = self.parse_primary()?;
            lhs = binary(BinaryOp::Union, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let span = self.current.span;
        match &self.current.kind {
            TokenKind::Number(n) => {
                let n = n.clone();
                self.advance();
                Ok(Expr::Number(n, span))
            }
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                Ok(Expr::String(s, span))
            }
            TokenKind::Reference(name) => {
                let name = name.clone();
                self.advance();
                Ok(Expr::Reference(name, span))
            }
            TokenKind::Path(path) => {
                let path = path.clone();
                self.advance();
                Ok(Expr::Path(path, span))
            }
            TokenKind::Name(name) => {
                let name = name.clone();
                self.parse_call(name)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_or()?;
                let end = self.current.span;
                self.expect(&TokenKind::RParen)?;
                Ok(Expr::Group(Box::new(inner), span.to(end)))
            }
            TokenKind::Eof => Err(self.error("unexpected end of input")),
            TokenKind::Error(msg) => Err(self.error(msg)),
            other => Err(self.error(&format!("unexpected {}", other.name()))),
        }
    }

    /// Parses `name(args...)` and checks it against the function set.
    fn parse_call(&mut self, name: String) -> Result<Expr> {
        let start = self.current.span;
        self.advance();

        if self.current.kind != TokenKind::LParen {
            return Err(self.error_at(
                start,
                &format!("bare name `{name}`; reference questions as ${{{name}}}"),
            ));
        }
        let Some(arity) = functions::arity(&name) else {
            return Err(self.error_at(start, &format!("unknown function `{name}`")));
        };
        self.advance();

        let mut args = Vec::new();
        if self.current.kind != TokenKind::RParen {
            args.push(self.parse_or()?);
            while self.current.kind == TokenKind::Comma {
                self.advance();
                args.push(self.parse_or()?);
            }
        }

        let end = self.current.span;
        self.expect(&TokenKind::RParen)?;

        if !arity.accepts(args.len()) {
            return Err(self.error_at(
                start,
                &format!(
                    "`{name}` takes {arity} argument(s), got {}",
                    args.len()
                ),
            ));
        }

        Ok(Expr::Call {
            name,
            args,
            span: start.to(end),
        })
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    /// Expects the current token to be of a specific kind, then advances.
    fn expect(&mut self, expected: &TokenKind) -> Result<()> {
        let matches =
            std::mem::discriminant(&self.current.kind) == std::mem::discriminant(expected);

        if matches {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!(
                "expected {}, found {}",
                expected.name(),
                self.current.kind.name()
            )))
        }
    }

    /// Creates a parse error at the current position.
    fn error(&self, message: &str) -> Error {
        self.error_at(self.current.span, message)
    }

    /// Creates a parse error at a specific span.
    fn error_at(&self, span: Span, message: &str) -> Error {
        Error::expression_syntax(message, self.source, span.column)
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    let span = lhs.span().to(rhs.span());
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        span,
    }
}

/// Parses expression source into an AST.
///
/// # Errors
/// Returns an `ExpressionSyntax` error if the source cannot be parsed.
pub fn parse(source: &str) -> Result<Expr> {
    Parser::new(source).parse()
}
