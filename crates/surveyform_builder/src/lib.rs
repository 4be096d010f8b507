//! Building survey documents from rows or XForm trees.
//!
//! This crate provides:
//! - [`build_from_rows`] - The XLSForm direction: row schema, choice linking
//!   and the [`SurveyMachine`] that turns begin/end markers into nesting
//! - [`build_from_xform`] - The XForm direction: path-indexed reading of an
//!   already-parsed tree
//! - [`BuildConfig`] - Column strictness, warnings and the default root name
//!
//! Both directions produce the same [`Build`] for equivalent inputs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod draft;
pub mod linker;
pub mod machine;
pub mod schema;
pub mod xform_reader;

pub use config::{BuildConfig, DEFAULT_ROOT_NAME};
pub use linker::ChoiceLinker;
pub use machine::{BuilderState, SurveyMachine};
pub use schema::{ChoiceRow, SettingsRow, SurveyRow};

use surveyform_document::SurveyDocument;
use surveyform_foundation::{Result, Warning, Workbook, XmlNode};
use tracing::debug;

use crate::draft::Syntax;
use crate::schema::sheet_row;

/// A finished build: the document plus non-fatal findings.
#[derive(Clone, Debug)]
pub struct Build {
    /// The built document.
    pub document: SurveyDocument,
    /// Warnings raised along the way, in the order they were found.
    pub warnings: Vec<Warning>,
}

/// Builds a document from authoring rows with the default configuration.
///
/// # Errors
/// See [`build_from_rows_with_config`].
pub fn build_from_rows(workbook: &Workbook) -> Result<Build> {
    build_from_rows_with_config(workbook, &BuildConfig::default())
}

/// Builds a document from authoring rows.
///
/// Blank rows are skipped on every sheet. Row numbers in errors count the
/// header as row 1.
///
/// # Errors
/// Returns the first structure, type, naming, reference or choice-list
/// error found; no partial document is produced.
pub fn build_from_rows_with_config(workbook: &Workbook, config: &BuildConfig) -> Result<Build> {
    debug!(
        survey = workbook.survey.len(),
        choices = workbook.choices.len(),
        "building survey from rows"
    );

    let SettingsRow {
        settings,
        root_name,
    } = SettingsRow::parse(workbook.settings.as_ref(), config)?;
    let root_name = root_name.unwrap_or_else(|| config.root_name.clone());

    let mut linker = ChoiceLinker::new();
    for (index, row) in workbook.choices.iter().enumerate() {
        if row.is_blank() {
            continue;
        }
        linker.add_row(ChoiceRow::parse(row, sheet_row(index))?);
    }

    let mut machine = SurveyMachine::new(&root_name);
    for (index, row) in workbook.survey.iter().enumerate() {
        if row.is_blank() {
            continue;
        }
        let line = sheet_row(index);
        machine.accept(SurveyRow::parse(row, line, config)?, line)?;
    }
    let (root, symbols) = machine.finish()?;
    let (lists, warnings) = linker.finish();

    draft::assemble(
        root,
        &symbols,
        lists,
        settings,
        warnings,
        Syntax::Flat,
        config,
    )
}

/// Builds a document from an XForm tree with the default configuration.
///
/// # Errors
/// See [`build_from_xform_with_config`].
pub fn build_from_xform(tree: &XmlNode) -> Result<Build> {
    build_from_xform_with_config(tree, &BuildConfig::default())
}

/// Builds a document from an already-parsed XForm tree.
///
/// # Errors
/// Returns `UnknownType` for an unrecognized bind type and `MalformedXForm`
/// for everything else that is wrong with the tree.
pub fn build_from_xform_with_config(tree: &XmlNode, config: &BuildConfig) -> Result<Build> {
    xform_reader::read(tree, config)
}
