//! Choice list linking.
//!
//! Choices arrive as a flat stream of `(list, choice)` pairs. The linker
//! groups them by list, keeping the first-seen order of lists and of choices
//! within each list, and later checks that select questions name a list
//! that exists and is not empty.

use surveyform_document::{Choice, ChoiceList, ChoiceLists};
use surveyform_foundation::{Error, Result, Warning};
use tracing::warn;

use crate::schema::ChoiceRow;

/// Groups choices into lists.
#[derive(Debug, Default)]
pub struct ChoiceLinker {
    lists: ChoiceLists,
    warnings: Vec<Warning>,
}

impl ChoiceLinker {
    /// Creates an empty linker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a choice to a list, creating the list on first sight.
    ///
    /// A choice whose name already appears in the list is kept and reported
    /// as a [`Warning::DuplicateChoice`].
    pub fn add(&mut self, list_name: &str, choice: Choice) {
        let list = self
            .lists
            .entry(list_name.to_string())
            .or_insert_with(|| ChoiceList::new(list_name));
        if list.get(&choice.name).is_some() {
            let warning = Warning::DuplicateChoice {
                list: list_name.to_string(),
                choice: choice.name.clone(),
            };
            warn!(%warning, "duplicate choice");
            self.warnings.push(warning);
        }
        list.choices.push(choice);
    }

    /// Adds a checked choices-sheet row.
    pub fn add_row(&mut self, row: ChoiceRow) {
        let choice = Choice {
            name: row.name,
            label: row.label,
            extras: row.extras,
        };
        self.add(&row.list_name, choice);
    }

    /// Returns true if a list of this name has been started.
    #[must_use]
    pub fn contains_list(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    /// Returns the grouped lists and the warnings raised while grouping.
    #[must_use]
    pub fn finish(self) -> (ChoiceLists, Vec<Warning>) {
        (self.lists, self.warnings)
    }
}

/// Checks that a select question's list exists and has choices.
///
/// # Errors
/// Returns `DanglingChoiceList` if the list is unnamed, undefined or empty.
pub fn link(lists: &ChoiceLists, question: &str, list_name: Option<&str>) -> Result<()> {
    let list = list_name.unwrap_or_default();
    match lists.get(list) {
        Some(found) if !found.is_empty() => Ok(()),
        _ => Err(Error::dangling_choice_list(question, list)),
    }
}
