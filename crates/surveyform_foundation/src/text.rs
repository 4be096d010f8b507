//! Localized text.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Language key used for text given without a language qualifier.
pub const DEFAULT_LANGUAGE: &str = "default";

/// Text in zero or more languages, keyed by language name.
///
/// Empty strings are never stored, so a label set to `""` is the same as no
/// label at all.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Text {
    translations: BTreeMap<String, String>,
}

impl Text {
    /// Creates empty text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates text in the default language only.
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        Self::new().with(DEFAULT_LANGUAGE, value)
    }

    /// Builder method adding a translation.
    #[must_use]
    pub fn with(mut self, language: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(language, value);
        self
    }

    /// Sets the text for a language. Empty values are ignored.
    pub fn insert(&mut self, language: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.translations.insert(language.into(), value);
        }
    }

    /// Returns the text for a language.
    #[must_use]
    pub fn get(&self, language: &str) -> Option<&str> {
        self.translations.get(language).map(String::as_str)
    }

    /// Returns the default-language text.
    #[must_use]
    pub fn default_text(&self) -> Option<&str> {
        self.get(DEFAULT_LANGUAGE)
    }

    /// Returns true if no language has text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    /// Returns true if any language other than the default has text.
    #[must_use]
    pub fn is_translated(&self) -> bool {
        self.translations.keys().any(|lang| lang != DEFAULT_LANGUAGE)
    }

    /// Iterates languages in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.translations.keys().map(String::as_str)
    }

    /// Iterates `(language, text)` pairs in language order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.translations
            .iter()
            .map(|(lang, value)| (lang.as_str(), value.as_str()))
    }
}
