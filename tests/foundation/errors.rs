//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use surveyform_foundation::{Error, ErrorContext, ErrorKind, Warning};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_unknown_type() {
    let err = Error::unknown_type("slider");
    assert!(matches!(err.kind, ErrorKind::UnknownType(ref t) if t == "slider"));
    assert!(format!("{err}").contains("slider"));
}

#[test]
fn error_unresolved_reference() {
    let err = Error::unresolved_reference("income", "${income} > 10");
    let msg = format!("{err}");
    assert!(msg.contains("income"));
    assert!(msg.contains("${income} > 10"));
}

#[test]
fn error_dangling_choice_list() {
    let err = Error::dangling_choice_list("color", "colors");
    assert!(matches!(err.kind, ErrorKind::DanglingChoiceList { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("color"));
    assert!(msg.contains("colors"));
}

#[test]
fn error_unterminated_group() {
    let err = Error::unterminated_group("household", "repeat");
    assert_eq!(format!("{err}"), "unterminated repeat \"household\"");
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_renders_sheet_row_and_node() {
    let err = Error::duplicate_name("age").with_context(
        ErrorContext::new()
            .with_sheet("survey")
            .with_row(7)
            .with_node("age"),
    );
    assert_eq!(
        format!("{err}"),
        "duplicate name: \"age\" at survey:7 (node \"age\")"
    );
    assert_eq!(err.row(), Some(7));
    assert_eq!(err.node(), Some("age"));
}

#[test]
fn context_node_only() {
    let err = Error::malformed_xform("no model").with_context(ErrorContext::new().with_node("q"));
    assert_eq!(format!("{err}"), "malformed xform: no model (node \"q\")");
    assert_eq!(err.row(), None);
}

#[test]
fn or_context_keeps_inner_context() {
    let inner = ErrorContext::new().with_node("inner");
    let err = Error::structure("x")
        .with_context(inner)
        .or_context(ErrorContext::new().with_node("outer"));
    assert_eq!(err.node(), Some("inner"));

    let err = Error::structure("x").or_context(ErrorContext::new().with_node("outer"));
    assert_eq!(err.node(), Some("outer"));
}

// =============================================================================
// Warnings
// =============================================================================

#[test]
fn warning_display() {
    let warning = Warning::DuplicateChoice {
        list: "yn".into(),
        choice: "yes".into(),
    };
    assert_eq!(format!("{warning}"), "duplicate choice \"yes\" in list \"yn\"");
    let warning = Warning::UnreferencedChoiceList { list: "spare".into() };
    assert!(format!("{warning}").contains("spare"));
}
