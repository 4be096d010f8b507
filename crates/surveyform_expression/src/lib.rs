//! Lexer, parser, symbol table, and reference translator for survey logic
//! expressions.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenization of expression source
//! - [`Parser`] - Parsing tokens into an [`Expr`] tree, checking calls
//!   against the restricted function set
//! - [`SymbolTable`] - The flat namespace of node names and their paths
//! - [`Translator`] - Rewriting `${name}` references to tree-relative paths
//!   and back

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod path;
pub mod span;
pub mod symbols;
pub mod token;
pub mod translate;

pub use ast::{BinaryOp, Expr, NodeRef};
pub use lexer::{Lexer, is_valid_name};
pub use parser::{Parser, parse};
pub use path::{NodePath, ReferenceScope, RelativePath};
pub use span::Span;
pub use symbols::{Symbol, SymbolKind, SymbolTable};
pub use token::{Token, TokenKind};
pub use translate::{Expression, ResolvedReference, Translator};
