//! Error and warning types for surveyform.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// Result type alias using the surveyform [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for surveyform operations.
///
/// Every build failure is fatal to the single build call; the caller receives
/// one of these naming the offending row or node and never a partial document.
#[derive(Debug, Error)]
#[error("{kind}{}", suffix(.context))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Adds context only if none has been attached yet.
    #[must_use]
    pub fn or_context(mut self, context: ErrorContext) -> Self {
        if self.context.is_none() {
            self.context = Some(context);
        }
        self
    }

    /// Creates a structure error (malformed group/repeat nesting).
    #[must_use]
    pub fn structure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Structure {
            message: message.into(),
        })
    }

    /// Creates an unterminated group error.
    #[must_use]
    pub fn unterminated_group(name: impl Into<String>, container: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnterminatedGroup {
            name: name.into(),
            container: container.into(),
        })
    }

    /// Creates an unknown type error.
    #[must_use]
    pub fn unknown_type(token: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownType(token.into()))
    }

    /// Creates an unresolved reference error.
    #[must_use]
    pub fn unresolved_reference(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvedReference {
            name: name.into(),
            expression: expression.into(),
        })
    }

    /// Creates a dangling choice list error.
    #[must_use]
    pub fn dangling_choice_list(question: impl Into<String>, list: impl Into<String>) -> Self {
        Self::new(ErrorKind::DanglingChoiceList {
            question: question.into(),
            list: list.into(),
        })
    }

    /// Creates a duplicate name error.
    #[must_use]
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateName(name.into()))
    }

    /// Creates a malformed XForm error.
    #[must_use]
    pub fn malformed_xform(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedXForm(message.into()))
    }

    /// Creates a malformed row error.
    #[must_use]
    pub fn malformed_row(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedRow(message.into()))
    }

    /// Creates an expression syntax error.
    #[must_use]
    pub fn expression_syntax(
        message: impl Into<String>,
        expression: impl Into<String>,
        column: u32,
    ) -> Self {
        Self::new(ErrorKind::ExpressionSyntax {
            message: message.into(),
            expression: expression.into(),
            column,
        })
    }

    /// Returns the name of the node this error points at, if known.
    #[must_use]
    pub fn node(&self) -> Option<&str> {
        self.context.as_ref().and_then(|c| c.node.as_deref())
    }

    /// Returns the spreadsheet row this error points at, if known.
    #[must_use]
    pub fn row(&self) -> Option<usize> {
        self.context.as_ref().and_then(|c| c.row)
    }
}

fn suffix(context: &Option<ErrorContext>) -> String {
    context.as_ref().map(|c| format!(" {c}")).unwrap_or_default()
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed group/repeat nesting, e.g. a closer that does not match its opener.
    #[error("structure error: {message}")]
    Structure {
        /// Description of the nesting problem.
        message: String,
    },

    /// The row stream ended while a group or repeat was still open.
    #[error("unterminated {container} \"{name}\"")]
    UnterminatedGroup {
        /// Name of the container left open.
        name: String,
        /// `group` or `repeat`.
        container: String,
    },

    /// A type token did not match any known alias.
    #[error("unknown type: \"{0}\"")]
    UnknownType(String),

    /// An expression referenced a name that does not exist in the document.
    #[error("unresolved reference to \"{name}\" in expression `{expression}`")]
    UnresolvedReference {
        /// The referenced name.
        name: String,
        /// The expression source text.
        expression: String,
    },

    /// A select question referenced a missing or empty choice list.
    #[error("question \"{question}\" references missing or empty choice list \"{list}\"")]
    DanglingChoiceList {
        /// The select question.
        question: String,
        /// The referenced list name (may be empty).
        list: String,
    },

    /// Two nodes share a name.
    #[error("duplicate name: \"{0}\"")]
    DuplicateName(String),

    /// The XForm tree does not have the expected shape.
    #[error("malformed xform: {0}")]
    MalformedXForm(String),

    /// A row failed schema validation at ingestion.
    #[error("malformed row: {0}")]
    MalformedRow(String),

    /// An expression could not be parsed.
    #[error("expression syntax error at column {column}: {message} in `{expression}`")]
    ExpressionSyntax {
        /// Description of the syntax error.
        message: String,
        /// The expression source text.
        expression: String,
        /// Column number (1-indexed, in characters).
        column: u32,
    },
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Sheet name (`survey`, `choices`, `settings`) or `xform`.
    pub sheet: Option<String>,
    /// 1-based spreadsheet row number; the header is row 1.
    pub row: Option<usize>,
    /// Name of the offending node.
    pub node: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sheet name.
    #[must_use]
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Sets the spreadsheet row number.
    #[must_use]
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Sets the offending node name.
    #[must_use]
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.sheet, self.row) {
            (Some(sheet), Some(row)) => write!(f, "at {sheet}:{row}")?,
            (Some(sheet), None) => write!(f, "in {sheet}")?,
            (None, Some(row)) => write!(f, "at row {row}")?,
            (None, None) => {}
        }
        if let Some(node) = &self.node {
            if self.sheet.is_some() || self.row.is_some() {
                f.write_str(" ")?;
            }
            write!(f, "(node \"{node}\")")?;
        }
        Ok(())
    }
}

/// Non-fatal issues found during a build, returned alongside a valid document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Warning {
    /// The same choice name appears twice in one list.
    DuplicateChoice {
        /// The list containing the duplicate.
        list: String,
        /// The repeated choice name.
        choice: String,
    },
    /// A choice list is defined but no select question uses it.
    UnreferencedChoiceList {
        /// The unused list.
        list: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateChoice { list, choice } => {
                write!(f, "duplicate choice \"{choice}\" in list \"{list}\"")
            }
            Self::UnreferencedChoiceList { list } => {
                write!(f, "choice list \"{list}\" is never referenced")
            }
        }
    }
}
