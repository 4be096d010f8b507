//! surveyform - Bidirectional compiler between XLSForm rows and XForm trees
//!
//! This crate re-exports all layers of the surveyform system and the five
//! operations most callers need. For detailed documentation, see the
//! individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: surveyform_emit        — XForm emitter, XLSForm emitter
//! Layer 3: surveyform_builder     — Row schema, choice linker, builder, XForm reader
//! Layer 2: surveyform_document    — Node tree, choice lists, structural equality
//! Layer 1: surveyform_expression  — Lexer, parser, symbols, expression translator
//! Layer 0: surveyform_foundation  — Core types (Error, CanonicalType, Row, XmlNode)
//! ```
//!
//! # Example
//!
//! ```
//! use surveyform::{Row, Workbook, build_from_rows, emit_rows, structural_equals};
//!
//! let workbook = Workbook::new(vec![
//!     Row::new().with("type", "integer").with("name", "age"),
//!     Row::new().with("type", "begin group").with("name", "adult"),
//!     Row::new()
//!         .with("type", "text")
//!         .with("name", "job")
//!         .with("relevant", "${age} >= 18"),
//!     Row::new().with("type", "end group"),
//! ]);
//! let doc = build_from_rows(&workbook)?.document;
//! let rebuilt = build_from_rows(&emit_rows(&doc)?)?.document;
//! assert!(structural_equals(&doc, &rebuilt));
//! # Ok::<(), surveyform::Error>(())
//! ```

pub use surveyform_builder as builder;
pub use surveyform_document as document;
pub use surveyform_emit as emit;
pub use surveyform_expression as expression;
pub use surveyform_foundation as foundation;

pub use surveyform_builder::{
    Build, BuildConfig, build_from_rows, build_from_rows_with_config, build_from_xform,
    build_from_xform_with_config,
};
pub use surveyform_document::{SurveyDocument, structural_equals};
pub use surveyform_emit::{EmitConfig, MarkerStyle, emit_rows, emit_rows_with_config, emit_xform};
pub use surveyform_foundation::{
    CanonicalType, Error, ErrorKind, Result, Row, Text, Warning, Workbook, XmlNode,
};
