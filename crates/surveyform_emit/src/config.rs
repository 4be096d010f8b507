//! Configuration for emitting documents.

/// How begin/end markers are spelled in emitted rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MarkerStyle {
    /// `begin group`, `end repeat`.
    #[default]
    Spaced,
    /// `begin_group`, `end_repeat`.
    Underscored,
}

impl MarkerStyle {
    /// Returns the separator between `begin`/`end` and the container kind.
    #[must_use]
    pub const fn separator(self) -> char {
        match self {
            Self::Spaced => ' ',
            Self::Underscored => '_',
        }
    }
}

/// Configuration for a single emit.
///
/// Formatting only: every style builds back to the same document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmitConfig {
    /// Spelling of begin/end markers.
    pub marker_style: MarkerStyle,
}

impl EmitConfig {
    /// Sets the marker spelling.
    #[must_use]
    pub fn with_marker_style(mut self, style: MarkerStyle) -> Self {
        self.marker_style = style;
        self
    }
}
