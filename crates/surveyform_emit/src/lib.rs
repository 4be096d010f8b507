//! Emitters turning a survey document back into rows or an XForm tree.
//!
//! This crate provides:
//! - [`emit_rows`] - Depth-first flattening into survey, choices and settings rows
//! - [`emit_xform`] - Instance skeleton, binds and body controls as one tree
//! - [`EmitConfig`] - Row formatting options
//!
//! Emitters take the document by shared reference and build new output; the
//! document is never changed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod row_writer;
pub mod xform_writer;

pub use config::{EmitConfig, MarkerStyle};
pub use row_writer::RowWriter;
pub use xform_writer::XFormWriter;

use surveyform_document::SurveyDocument;
use surveyform_foundation::{Result, Workbook, XmlNode};

/// Flattens a document into rows with the default configuration.
///
/// # Errors
/// See [`emit_rows_with_config`].
pub fn emit_rows(doc: &SurveyDocument) -> Result<Workbook> {
    emit_rows_with_config(doc, &EmitConfig::default())
}

/// Flattens a document into survey rows, choices rows for every referenced
/// list, and one settings row.
///
/// # Errors
/// Fails only for a hand-assembled document whose expressions point at
/// paths it does not contain.
pub fn emit_rows_with_config(doc: &SurveyDocument, config: &EmitConfig) -> Result<Workbook> {
    row_writer::write(doc, config)
}

/// Serializes a document as an XForm tree.
#[must_use]
pub fn emit_xform(doc: &SurveyDocument) -> XmlNode {
    xform_writer::write(doc)
}
