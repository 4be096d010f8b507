//! Integration tests for type alias resolution
//!
//! Tests that every authoring spelling lands on one canonical type.

use surveyform_foundation::alias::{self, ALIASES};
use surveyform_foundation::{CanonicalType, ErrorKind, TypeToken};

// =============================================================================
// Alias Convergence
// =============================================================================

#[test]
fn select_one_spellings_converge() {
    for spelling in [
        "select_one",
        "select one",
        "Select-One",
        "select1",
        "select one from",
        "add select one prompt using",
    ] {
        assert_eq!(
            alias::resolve(spelling).unwrap(),
            CanonicalType::SelectOne,
            "{spelling}"
        );
    }
}

#[test]
fn select_multiple_spellings_converge() {
    for spelling in [
        "select_multiple",
        "select all that apply",
        "select_all_that_apply_from",
        "add select multiple prompt using",
    ] {
        assert_eq!(
            alias::resolve(spelling).unwrap(),
            CanonicalType::SelectMultiple,
            "{spelling}"
        );
    }
}

#[test]
fn every_canonical_name_resolves_to_itself() {
    for qtype in CanonicalType::ALL {
        assert_eq!(alias::resolve(qtype.name()).unwrap(), qtype);
    }
}

#[test]
fn alias_table_is_normalized() {
    for (spelling, _) in ALIASES {
        assert_eq!(alias::normalize(spelling), *spelling);
    }
}

#[test]
fn unknown_type_has_no_fallback() {
    let err = alias::resolve("slider").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownType(_)));
}

// =============================================================================
// Type Tokens
// =============================================================================

#[test]
fn select_takes_one_list_name() {
    assert_eq!(
        TypeToken::parse("select all that apply Toppings").unwrap(),
        TypeToken::Question {
            qtype: CanonicalType::SelectMultiple,
            list_name: Some("Toppings".into()),
        }
    );
    assert!(TypeToken::parse("select_one a b").is_err());
    assert!(TypeToken::parse("integer extra").is_err());
}

#[test]
fn markers_in_any_separator_style() {
    for token in ["begin group", "begin_group", "BEGIN-GROUP"] {
        assert_eq!(
            TypeToken::parse(token).unwrap(),
            TypeToken::Begin(CanonicalType::Group)
        );
    }
    assert_eq!(
        TypeToken::parse("end_repeat").unwrap(),
        TypeToken::End(CanonicalType::Repeat)
    );
}
