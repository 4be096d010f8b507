//! Configuration for survey builds.

/// Root instance element name used when the settings do not name one.
pub const DEFAULT_ROOT_NAME: &str = "data";

/// Configuration for a single build.
///
/// Controls how strictly rows are checked and which warnings are reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildConfig {
    /// Reject unknown survey, choices and settings columns.
    pub strict_columns: bool,

    /// Warn about choice lists no question uses.
    pub warn_unreferenced_lists: bool,

    /// Root instance element name when the settings do not set `name`.
    pub root_name: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            strict_columns: true,
            warn_unreferenced_lists: true,
            root_name: DEFAULT_ROOT_NAME.to_string(),
        }
    }
}

impl BuildConfig {
    /// Creates a configuration that ignores unknown columns and reports no
    /// unreferenced lists, for workbooks carrying tool-specific columns.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            strict_columns: false,
            warn_unreferenced_lists: false,
            ..Self::default()
        }
    }

    /// Builder method to set column strictness.
    #[must_use]
    pub fn with_strict_columns(mut self, strict: bool) -> Self {
        self.strict_columns = strict;
        self
    }

    /// Builder method to enable/disable unreferenced-list warnings.
    #[must_use]
    pub fn with_warn_unreferenced_lists(mut self, warn: bool) -> Self {
        self.warn_unreferenced_lists = warn;
        self
    }

    /// Builder method to set the default root element name.
    #[must_use]
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }
}
