//! Integration tests for the XLSForm emitter
//!
//! Tests row order, column spelling and choice filtering.

use surveyform_builder::build_from_rows;
use surveyform_document::SurveyDocument;
use surveyform_emit::{EmitConfig, MarkerStyle, emit_rows, emit_rows_with_config};
use surveyform_foundation::{Row, Workbook};

// =============================================================================
// Helper Functions
// =============================================================================

fn row(kind: &str, name: &str) -> Row {
    Row::new().with("type", kind).with("name", name)
}

fn survey() -> SurveyDocument {
    let workbook = Workbook::new(vec![
        row("select one from yn", "consent")
            .with("label", "Consent?")
            .with("label::sw", "Idhini?")
            .with("required", "TRUE"),
        row("begin group", "person").with("relevant", "${consent} = 'yes'"),
        row("int", "age").with("constraint", ". < 120").with("constraint_message", "Too old"),
        row("begin repeat", "child"),
        row("text", "child_name").with("relevant", "${age} > 18"),
        row("end repeat", ""),
        row("end group", ""),
        row("calculation", "adult").with("calculation", "${age} >= 18"),
    ])
    .with_choices(vec![
        Row::new().with("list_name", "yn").with("name", "yes").with("label", "Yes"),
        Row::new().with("list_name", "yn").with("name", "no").with("label", "No"),
        Row::new().with("list_name", "unused").with("name", "x").with("label", "X"),
    ])
    .with_settings(Row::new().with("form_title", "Intake").with("version", "3"));
    build_from_rows(&workbook).unwrap().document
}

// =============================================================================
// Survey Rows
// =============================================================================

#[test]
fn rows_follow_depth_first_order() {
    let workbook = emit_rows(&survey()).unwrap();
    let types: Vec<_> = workbook
        .survey
        .iter()
        .map(|r| r.get("type").unwrap())
        .collect();
    assert_eq!(
        types,
        vec![
            "select_one yn",
            "begin group",
            "integer",
            "begin repeat",
            "text",
            "end repeat",
            "end group",
            "calculate",
        ]
    );
}

#[test]
fn aliases_are_written_canonically() {
    let workbook = emit_rows(&survey()).unwrap();
    let consent = &workbook.survey[0];
    assert_eq!(consent.get("required"), Some("yes"));
    assert_eq!(consent.get("label"), Some("Consent?"));
    assert_eq!(consent.get("label::sw"), Some("Idhini?"));
}

#[test]
fn expressions_return_to_flat_names() {
    let workbook = emit_rows(&survey()).unwrap();
    assert_eq!(workbook.survey[1].get("relevant"), Some("${consent} = 'yes'"));
    assert_eq!(workbook.survey[2].get("constraint"), Some(". < 120"));
    assert_eq!(workbook.survey[4].get("relevant"), Some("${age} > 18"));
    assert_eq!(workbook.survey[7].get("calculation"), Some("${age} >= 18"));
}

#[test]
fn end_markers_carry_no_name() {
    let workbook = emit_rows(&survey()).unwrap();
    assert_eq!(workbook.survey[5].get("name"), None);
    assert_eq!(workbook.survey[6].get("name"), None);
}

#[test]
fn marker_style_only_changes_spelling() {
    let config = EmitConfig::default().with_marker_style(MarkerStyle::Underscored);
    let spaced = emit_rows(&survey()).unwrap();
    let underscored = emit_rows_with_config(&survey(), &config).unwrap();
    assert_eq!(underscored.survey[1].get("type"), Some("begin_group"));
    assert_eq!(
        spaced.survey[2].get("type"),
        underscored.survey[2].get("type")
    );
}

// =============================================================================
// Choices and Settings
// =============================================================================

#[test]
fn only_referenced_choices_are_written() {
    let workbook = emit_rows(&survey()).unwrap();
    let lists: Vec<_> = workbook
        .choices
        .iter()
        .map(|r| r.get("list_name").unwrap())
        .collect();
    assert_eq!(lists, vec!["yn", "yn"]);
}

#[test]
fn settings_row_names_root() {
    let settings = emit_rows(&survey()).unwrap().settings.unwrap();
    assert_eq!(settings.get("form_title"), Some("Intake"));
    assert_eq!(settings.get("version"), Some("3"));
    assert_eq!(settings.get("name"), Some("data"));
    assert_eq!(settings.get("form_id"), None);
}

#[test]
fn emitting_does_not_change_the_document() {
    let doc = survey();
    let before = doc.clone();
    let _ = emit_rows(&doc).unwrap();
    assert_eq!(doc, before);
}
