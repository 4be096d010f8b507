//! Core types, errors, type aliases, rows, and XML trees for surveyform.
//!
//! This crate provides:
//! - [`Error`] and [`Warning`] - Rich error types with row/node context
//! - [`CanonicalType`] - The closed set of canonical question types
//! - [`alias`] - Resolution of author-facing type tokens to canonical types
//! - [`Row`] and [`Workbook`] - The tabular authoring representation
//! - [`XmlNode`] - The already-parsed hierarchical representation
//! - [`xform`] - XForm names and small reference syntaxes
//! - [`Text`] - Per-language text

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod alias;
pub mod error;
pub mod row;
pub mod text;
pub mod types;
pub mod xform;
pub mod xml;

pub use alias::TypeToken;
pub use error::{Error, ErrorContext, ErrorKind, Result, Warning};
pub use row::{Row, Workbook, split_language};
pub use text::{DEFAULT_LANGUAGE, Text};
pub use types::{Arity, CanonicalType};
pub use xml::XmlNode;
