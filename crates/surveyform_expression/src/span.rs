//! Byte ranges into expression source.
//!
//! References are rewritten by splicing their exact byte range, so every
//! other character of an expression is copied through untouched.

/// A byte range of source text plus the column errors report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset where this span starts.
    pub start: usize,
    /// Byte offset where this span ends (exclusive).
    pub end: usize,
    /// 1-based column, in characters, where this span starts.
    pub column: u32,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize, column: u32) -> Self {
        Self { start, end, column }
    }

    /// Creates an empty span at the start of input.
    #[must_use]
    pub const fn at_start() -> Self {
        Self::new(0, 0, 1)
    }

    /// Covers everything from the start of `self` to the end of `other`.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self::new(self.start, other.end, self.column)
    }

    /// Returns the source text under this span.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}
