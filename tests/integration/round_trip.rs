//! Round-trip integration tests
//!
//! Tests rows → document → rows and document → XForm → document on
//! hand-written surveys.

use surveyform::{
    BuildConfig, CanonicalType, ErrorKind, Row, Workbook, build_from_rows,
    build_from_rows_with_config, build_from_xform, emit_rows, emit_xform, structural_equals,
};
use surveyform::document::SurveyDocument;
use surveyform::expression::ReferenceScope;

// =============================================================================
// Helper Functions
// =============================================================================

fn row(kind: &str, name: &str) -> Row {
    Row::new().with("type", kind).with("name", name)
}

fn end(kind: &str) -> Row {
    Row::new().with("type", kind)
}

fn census() -> Workbook {
    Workbook::new(vec![
        row("start", "started"),
        row("integer", "income")
            .with("label", "Monthly income")
            .with("label::Français", "Revenu mensuel")
            .with("constraint", ". >= 0")
            .with("constraint_message", "Must not be negative")
            .with("constraint_message::Français", "Doit être positif"),
        row("begin group", "household")
            .with("label", "Household")
            .with("relevant", "${income} > 1000"),
        row("select_one yes_no", "owns_home").with("label", "Own your home?"),
        row("begin repeat", "member").with("label", "Member"),
        row("text", "member_name").with("label", "Name").with("required", "yes"),
        row("integer", "member_age").with("label", "Age"),
        row("note", "elder_note")
            .with("label", "Thank them 🙏")
            .with("relevant", "${member_age} > 65"),
        end("end repeat"),
        end("end group"),
        row("calculate", "share").with("calculation", "${income} div count(${member_name})"),
        row("select_multiple assets", "assets").with("label", "Assets").with("appearance", "minimal"),
        row("geopoint", "location").with("hint", "Stand outside"),
    ])
    .with_choices(vec![
        Row::new().with("list_name", "yes_no").with("name", "yes").with("label", "Yes").with("label::Français", "Oui"),
        Row::new().with("list_name", "yes_no").with("name", "no").with("label", "No").with("label::Français", "Non"),
        Row::new().with("list_name", "assets").with("name", "car").with("label", "Car").with("value", "3"),
        Row::new().with("list_name", "assets").with("name", "bike").with("label", "Bike"),
    ])
    .with_settings(
        Row::new()
            .with("form_title", "Census")
            .with("form_id", "census_2024")
            .with("version", "7")
            .with("default_language", "English"),
    )
}

fn built(workbook: &Workbook) -> SurveyDocument {
    build_from_rows(workbook).unwrap().document
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn rows_round_trip() {
    let doc = built(&census());
    let rebuilt = built(&emit_rows(&doc).unwrap());
    assert!(structural_equals(&doc, &rebuilt));
}

#[test]
fn xform_round_trip() {
    let doc = built(&census());
    let rebuilt = build_from_xform(&emit_xform(&doc)).unwrap().document;
    assert!(structural_equals(&doc, &rebuilt));
}

#[test]
fn xform_then_rows_round_trip() {
    let doc = built(&census());
    let via_xform = build_from_xform(&emit_xform(&doc)).unwrap().document;
    let via_rows = built(&emit_rows(&via_xform).unwrap());
    assert!(structural_equals(&doc, &via_rows));
    let expression = via_rows.walk()[8].node.as_question().unwrap().calculation.clone();
    assert_eq!(
        expression.unwrap().source(),
        "${income} div count(${member_name})"
    );
}

#[test]
fn inline_labels_round_trip() {
    let workbook = Workbook::new(vec![
        row("text", "q").with("label", "Plain").with("hint", "Just text"),
        row("select_one c", "pick").with("label", "Pick"),
    ])
    .with_choices(vec![
        Row::new().with("list_name", "c").with("name", "a").with("label", "A"),
    ]);
    let doc = built(&workbook);
    let tree = emit_xform(&doc);
    let rebuilt = build_from_xform(&tree).unwrap().document;
    assert!(structural_equals(&doc, &rebuilt));
}

fn survives_xform(workbook: &Workbook) -> bool {
    let doc = built(workbook);
    let rebuilt = build_from_xform(&emit_xform(&doc)).unwrap().document;
    structural_equals(&doc, &rebuilt)
}

#[test]
fn group_named_meta_round_trips() {
    let workbook = Workbook::new(vec![
        row("begin group", "meta").with("label", "Meta info"),
        row("text", "who").with("label", "Who"),
        end("end group"),
    ]);
    assert!(survives_xform(&workbook));
}

#[test]
fn namespaced_choice_columns_round_trip() {
    let workbook = Workbook::new(vec![row("select_one colors", "color").with("label", "Color")])
        .with_choices(vec![
            Row::new()
                .with("list_name", "colors")
                .with("name", "red")
                .with("label", "Red")
                .with("media::image", "red.png"),
        ]);
    assert!(survives_xform(&workbook));
    let doc = built(&workbook);
    let red = &doc.choices()["colors"].choices[0];
    assert_eq!(red.extras.get("media::image").map(String::as_str), Some("red.png"));
}

#[test]
fn labels_without_controls_round_trip() {
    let workbook = Workbook::new(vec![
        row("calculate", "total").with("calculation", "1 + 1").with("label", "Total"),
        row("hidden", "source").with("hint", "Where the record came from"),
        row("deviceid", "device").with("label", "Device"),
        row("text", "q").with("label", "Plain"),
    ]);
    assert!(survives_xform(&workbook));
}

#[test]
fn hidden_with_calculation_is_rejected() {
    let workbook = Workbook::new(vec![
        row("hidden", "h").with("calculation", "1 + 1"),
    ]);
    let err = build_from_rows(&workbook).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedRow(_)));
    assert_eq!(err.row(), Some(2));
}

#[test]
fn determinism() {
    let a = built(&census());
    let b = built(&census());
    assert_eq!(a, b);
    assert_eq!(emit_rows(&a).unwrap(), emit_rows(&b).unwrap());
    assert_eq!(emit_xform(&a), emit_xform(&b));
}

#[test]
fn unicode_labels_round_trip_unchanged() {
    let label = "ñandú 🦜 a\u{0308}\u{0301} 中文";
    let doc = built(&Workbook::new(vec![row("text", "bird").with("label", label)]));
    let rebuilt = built(&emit_rows(&doc).unwrap());
    assert_eq!(rebuilt.walk()[0].node.label().default_text(), Some(label));
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn select_one_spellings_build_the_same_document() {
    let choices = vec![Row::new().with("list_name", "yn").with("name", "y").with("label", "Y")];
    let a = built(&Workbook::new(vec![row("select_one yn", "q")]).with_choices(choices.clone()));
    let b = built(&Workbook::new(vec![row("select one from yn", "q")]).with_choices(choices));
    assert!(structural_equals(&a, &b));
    assert_eq!(
        a.walk()[0].node.as_question().unwrap().qtype,
        CanonicalType::SelectOne
    );
}

#[test]
fn select_without_list_is_dangling() {
    for kind in ["select_one", "select_one missing"] {
        let err = build_from_rows(&Workbook::new(vec![row(kind, "q")])).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::DanglingChoiceList { .. }),
            "{kind}: {err}"
        );
    }
}

#[test]
fn mismatched_closer_is_structure_error() {
    let err = build_from_rows(&Workbook::new(vec![
        row("begin group", "g"),
        row("text", "q"),
        end("end repeat"),
    ]))
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Structure { .. }));
}

#[test]
fn local_versus_ancestor_reference() {
    let top = built(&Workbook::new(vec![
        row("integer", "income"),
        row("text", "luxury").with("relevant", "${income} > 1000"),
    ]));
    let local = top.walk()[1].node.relevant().unwrap().clone();
    assert_eq!(local.references()[0].scope, ReferenceScope::Local);
    assert_eq!(local.canonical(), "../income > 1000");

    let nested = built(&Workbook::new(vec![
        row("integer", "income"),
        row("begin group", "g"),
        row("text", "luxury").with("relevant", "${income} > 1000"),
        end("end group"),
    ]));
    let ancestor = nested.walk()[2].node.relevant().unwrap().clone();
    assert_eq!(
        ancestor.references()[0].scope,
        ReferenceScope::Ancestor { levels: 1 }
    );
    assert_eq!(ancestor.canonical(), "../../income > 1000");
}

#[test]
fn unreferenced_lists_do_not_survive_emit() {
    let workbook = Workbook::new(vec![row("text", "q")]).with_choices(vec![
        Row::new().with("list_name", "spare").with("name", "a").with("label", "A"),
    ]);
    let build = build_from_rows_with_config(&workbook, &BuildConfig::lenient()).unwrap();
    assert!(build.warnings.is_empty());
    let emitted = emit_rows(&build.document).unwrap();
    assert!(emitted.choices.is_empty());
    assert!(structural_equals(&build.document, &built(&emitted)));
}
