//! Lexer for survey logic expressions.
//!
//! The lexer converts expression source text into a stream of tokens. It
//! never fails outright: malformed input becomes a [`TokenKind::Error`] token
//! which the parser reports with its position.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer for expression source text.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current column number (1-based, in characters).
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            column: 1,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_column = self.column;

        let Some(c) = self.peek_char() else {
            return Token::new(
                TokenKind::Eof,
                Span::new(start, start, start_column),
            );
        };

        let kind = match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            ',' => self.single(TokenKind::Comma),
            '=' => self.single(TokenKind::Eq),
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '|' => self.single(TokenKind::Pipe),
            '!' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.advance();
                    TokenKind::NotEq
                } else {
                    TokenKind::Error("expected '=' after '!'".into())
                }
            }
            '<' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.advance();
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.advance();
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '$' => self.scan_reference(),
            '\'' | '"' => self.scan_string(c),
            '.' if self.peek_char_n(1).is_some_and(|n| n.is_ascii_digit()) => self.scan_number(),
            '.' | '/' => self.scan_path(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_name_start(c) => TokenKind::Name(self.scan_name_text(is_function_char)),
            c => {
                self.advance();
                TokenKind::Error(format!("unexpected character: {c}"))
            }
        };

        Token::new(
            kind,
            Span::new(start, self.position, start_column),
        )
    }

    /// Tokenizes all source and returns a vector of tokens ending in `Eof`.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peeks at the character `n` positions ahead.
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            self.column += 1;
        }
    }

    /// Consumes one character and yields `kind`.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Scans a `${name}` reference.
    fn scan_reference(&mut self) -> TokenKind {
        self.advance(); // consume '$'
        if self.peek_char() != Some('{') {
            return TokenKind::Error("expected '{' after '$'".into());
        }
        self.advance();

        let name = self.scan_name_text(is_node_char);
        if self.peek_char() != Some('}') {
            return TokenKind::Error("unterminated reference, expected '}'".into());
        }
        self.advance();

        if name.is_empty() || !name.starts_with(is_name_start) {
            TokenKind::Error(format!("invalid reference name: {name:?}"))
        } else {
            TokenKind::Reference(name)
        }
    }

    /// Scans a string literal delimited by `quote`. There are no escapes.
    fn scan_string(&mut self, quote: char) -> TokenKind {
        self.advance(); // consume opening quote
        let start = self.position;
        loop {
            match self.peek_char() {
                Some(c) if c == quote => {
                    let text = self.source[start..self.position].to_string();
                    self.advance();
                    return TokenKind::String(text);
                }
                Some(_) => self.advance(),
                None => return TokenKind::Error("unterminated string literal".into()),
            }
        }
    }

    /// Scans a number literal, keeping its spelling.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.position;
        let mut has_dot = false;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' && !has_dot {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::Number(self.source[start..self.position].to_string())
    }

    /// Scans a path: `.`, `..`, `./a`, `../a/b` or `/root/a`.
    fn scan_path(&mut self) -> TokenKind {
        let start = self.position;

        if self.peek_char() == Some('.') {
            self.scan_dots();
        }

        while self.peek_char() == Some('/') {
            self.advance();
            match self.peek_char() {
                Some('.') => self.scan_dots(),
                Some(c) if is_name_start(c) => {
                    self.scan_name_text(is_node_char);
                }
                _ => return TokenKind::Error("expected path step after '/'".into()),
            }
        }

        TokenKind::Path(self.source[start..self.position].to_string())
    }

    /// Scans a `.` or `..` step.
    fn scan_dots(&mut self) {
        self.advance();
        if self.peek_char() == Some('.') {
            self.advance();
        }
    }

    /// Scans a run of characters accepted by `accept`.
    fn scan_name_text(&mut self, accept: fn(char) -> bool) -> String {
        let start = self.position;
        while self.peek_char().is_some_and(accept) {
            self.advance();
        }
        self.source[start..self.position].to_string()
    }
}

/// Returns true if `c` can start a node or function name.
#[must_use]
pub fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Returns true if `c` can appear in a node name after the first character.
#[must_use]
pub fn is_node_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Returns true if `c` can appear in a function name after the first character.
fn is_function_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | ':')
}

/// Returns true if `name` is a valid node name.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start) && chars.all(is_node_char)
}
