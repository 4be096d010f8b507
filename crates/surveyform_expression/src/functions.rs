//! The restricted function set expressions may call.

use surveyform_foundation::Arity;

/// Every callable function and its arity.
pub const FUNCTIONS: &[(&str, Arity)] = &[
    // Selection
    ("selected", Arity::Exact(2)),
    ("selected-at", Arity::Exact(2)),
    ("count-selected", Arity::Exact(1)),
    ("jr:choice-name", Arity::Exact(2)),
    // Counting and aggregation
    ("count", Arity::Exact(1)),
    ("sum", Arity::Exact(1)),
    ("position", Arity::Range(0, 1)),
    // Coercion
    ("string", Arity::Range(0, 1)),
    ("number", Arity::Range(0, 1)),
    ("int", Arity::Exact(1)),
    ("boolean", Arity::Exact(1)),
    ("round", Arity::Range(1, 2)),
    // Logic
    ("not", Arity::Exact(1)),
    ("true", Arity::Exact(0)),
    ("false", Arity::Exact(0)),
    ("if", Arity::Exact(3)),
    ("coalesce", Arity::Exact(2)),
    // Strings
    ("concat", Arity::Variadic(1)),
    ("string-length", Arity::Range(0, 1)),
    ("substr", Arity::Range(2, 3)),
    ("contains", Arity::Exact(2)),
    ("starts-with", Arity::Exact(2)),
    ("regex", Arity::Exact(2)),
    ("uuid", Arity::Range(0, 1)),
    // Dates
    ("today", Arity::Exact(0)),
    ("now", Arity::Exact(0)),
];

/// Returns the arity of a callable function, or `None` if it is not allowed.
#[must_use]
pub fn arity(name: &str) -> Option<Arity> {
    FUNCTIONS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, arity)| *arity)
}
