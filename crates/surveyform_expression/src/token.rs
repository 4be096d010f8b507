//! Token types for survey logic expressions.
//!
//! Tokens are the output of the lexer and input to the parser.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the text this token covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }

    /// Returns true if this token refers to a node (a `${name}` or a path).
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self.kind, TokenKind::Reference(_) | TokenKind::Path(_))
    }
}

/// Token types for survey logic expressions.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Delimiters
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,

    // Operators
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `|`
    Pipe,

    // Literals
    /// Number literal like `1000` or `2.5`, kept as written
    Number(String),
    /// Quoted string literal, without its quotes
    String(String),

    // References
    /// Flat-name reference like `${income}`
    Reference(String),
    /// Tree path like `.`, `../income` or `/data/income`
    Path(String),
    /// Bare name: a function name or one of `and`, `or`, `div`, `mod`
    Name(String),

    // Meta
    /// End of input
    Eof,
    /// Lexer error
    Error(String),
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Comma => "','",
            Self::Eq => "'='",
            Self::NotEq => "'!='",
            Self::Lt => "'<'",
            Self::LtEq => "'<='",
            Self::Gt => "'>'",
            Self::GtEq => "'>='",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Pipe => "'|'",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Reference(_) => "reference",
            Self::Path(_) => "path",
            Self::Name(_) => "name",
            Self::Eof => "end of input",
            Self::Error(_) => "error",
        }
    }

    /// Returns true if this is the given keyword operator (`and`, `or`, `div`, `mod`).
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Self::Name(name) if name == keyword)
    }
}
