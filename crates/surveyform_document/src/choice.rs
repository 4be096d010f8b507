//! Choice lists for select questions.

use indexmap::IndexMap;
use surveyform_foundation::Text;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Choice lists keyed by list name, in first-seen order.
pub type ChoiceLists = IndexMap<String, ChoiceList>;

/// One option of a choice list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Choice {
    /// Stored value.
    pub name: String,
    /// Displayed text.
    pub label: Text,
    /// Additional columns carried verbatim (e.g. `filter` values).
    pub extras: IndexMap<String, String>,
}

impl Choice {
    /// Creates a choice with a plain label.
    #[must_use]
    pub fn new(name: impl Into<String>, label: Text) -> Self {
        Self {
            name: name.into(),
            label,
            extras: IndexMap::new(),
        }
    }

    /// Adds an extra column, returning the choice.
    #[must_use]
    pub fn with_extra(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(column.into(), value.into());
        self
    }
}

/// A named, ordered list of choices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChoiceList {
    /// List name, as referenced by `select_one <list>`.
    pub name: String,
    /// Choices in author order.
    pub choices: Vec<Choice>,
}

impl ChoiceList {
    /// Creates an empty list.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            choices: Vec::new(),
        }
    }

    /// Appends a choice, returning the list.
    #[must_use]
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Looks up a choice by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.name == name)
    }

    /// Returns true if the list has no choices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Returns the number of choices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Returns true if any choice label is translated.
    #[must_use]
    pub fn is_translated(&self) -> bool {
        self.choices.iter().any(|c| c.label.is_translated())
    }
}
