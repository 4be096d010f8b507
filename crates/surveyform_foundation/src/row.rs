//! Rows and workbooks: the tabular side of the compiler.
//!
//! A [`Row`] maps canonical column keys to raw string values. Absent and
//! empty cells are equivalent. A [`Workbook`] bundles the three sheets an
//! authoring document carries.

use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Separator between a column name and its language, as in `label::French`.
pub const LANGUAGE_SEPARATOR: &str = "::";

/// A single sheet row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Row {
    cells: IndexMap<String, String>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method setting a cell.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    /// Sets a cell, replacing any previous value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Returns a cell value, treating empty or blank cells as absent.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Iterates non-empty cells in column insertion order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(column, value)| (column.as_str(), value.as_str()))
    }

    /// Returns true if every cell is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells().next().is_none()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

/// Splits a column key into its base name and optional language.
///
/// `label::French (fr)` becomes `("label", Some("French (fr)"))`.
#[must_use]
pub fn split_language(column: &str) -> (&str, Option<&str>) {
    match column.split_once(LANGUAGE_SEPARATOR) {
        Some((base, lang)) => (base.trim(), Some(lang.trim())),
        None => (column.trim(), None),
    }
}

/// The three sheets of an authoring document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Workbook {
    /// Question, group and repeat rows in authoring order.
    pub survey: Vec<Row>,
    /// Choice rows, one per option.
    pub choices: Vec<Row>,
    /// Optional single settings row.
    pub settings: Option<Row>,
}

impl Workbook {
    /// Creates a workbook from survey rows alone.
    #[must_use]
    pub fn new(survey: Vec<Row>) -> Self {
        Self {
            survey,
            ..Self::default()
        }
    }

    /// Builder method setting the choices sheet.
    #[must_use]
    pub fn with_choices(mut self, choices: Vec<Row>) -> Self {
        self.choices = choices;
        self
    }

    /// Builder method setting the settings row.
    #[must_use]
    pub fn with_settings(mut self, settings: Row) -> Self {
        self.settings = Some(settings);
        self
    }
}
