//! Integration tests for building from rows
//!
//! Tests nesting, naming, choice linking, settings and row-numbered errors.

use surveyform_builder::{BuildConfig, build_from_rows, build_from_rows_with_config};
use surveyform_document::{Node, NodeKind};
use surveyform_foundation::{CanonicalType, ErrorKind, Row, Warning, Workbook};

// =============================================================================
// Helper Functions
// =============================================================================

fn row(kind: &str, name: &str) -> Row {
    Row::new().with("type", kind).with("name", name)
}

fn end(kind: &str) -> Row {
    Row::new().with("type", kind)
}

fn choice(list: &str, name: &str) -> Row {
    Row::new()
        .with("list_name", list)
        .with("name", name)
        .with("label", name.to_uppercase())
}

// =============================================================================
// Hierarchy
// =============================================================================

#[test]
fn sibling_order_follows_rows() {
    let workbook = Workbook::new(vec![
        row("begin group", "g"),
        row("text", "c"),
        row("text", "a"),
        row("text", "b"),
        end("end group"),
    ]);
    let doc = build_from_rows(&workbook).unwrap().document;
    let group = doc.children().next().unwrap();
    let names: Vec<_> = group.children().map(Node::name).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[test]
fn repeats_nest_in_groups() {
    let workbook = Workbook::new(vec![
        row("begin_group", "household"),
        row("begin_repeat", "member"),
        row("integer", "age"),
        end("end_repeat"),
        end("end_group"),
    ]);
    let doc = build_from_rows(&workbook).unwrap().document;
    let kinds: Vec<_> = doc.walk().iter().map(|v| v.node.kind()).collect();
    assert_eq!(
        kinds,
        vec![NodeKind::Group, NodeKind::Repeat, NodeKind::Question]
    );
}

#[test]
fn empty_group_is_kept() {
    let workbook = Workbook::new(vec![row("begin group", "g"), end("end group")]);
    let doc = build_from_rows(&workbook).unwrap().document;
    assert_eq!(doc.walk().len(), 1);
    assert_eq!(doc.children().next().unwrap().children().count(), 0);
}

#[test]
fn unicode_labels_survive() {
    let label = "Cuántos años tienes? 👨‍👩‍👧 e\u{301}";
    let workbook = Workbook::new(vec![row("integer", "age").with("label", label)]);
    let doc = build_from_rows(&workbook).unwrap().document;
    assert_eq!(doc.children().next().unwrap().label().default_text(), Some(label));
}

#[test]
fn translated_columns() {
    let workbook = Workbook::new(vec![
        row("text", "q")
            .with("label::English", "Name")
            .with("label::Español", "Nombre")
            .with("hint", "Full name"),
    ]);
    let doc = build_from_rows(&workbook).unwrap().document;
    let q = doc.children().next().unwrap().as_question().unwrap();
    assert_eq!(q.label.get("Español"), Some("Nombre"));
    assert_eq!(q.hint.default_text(), Some("Full name"));
    assert!(doc.is_translated());
}

// =============================================================================
// Choices
// =============================================================================

#[test]
fn choices_keep_order_and_extras() {
    let workbook = Workbook::new(vec![row("select_multiple fruit", "likes")]).with_choices(vec![
        choice("fruit", "pear").with("color", "green"),
        Row::new(),
        choice("fruit", "apple"),
    ]);
    let doc = build_from_rows(&workbook).unwrap().document;
    let list = &doc.choices()["fruit"];
    let names: Vec<_> = list.choices.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["pear", "apple"]);
    assert_eq!(list.choices[0].extras["color"], "green");
}

#[test]
fn duplicate_choice_warns() {
    let workbook = Workbook::new(vec![row("select_one yn", "ok")])
        .with_choices(vec![choice("yn", "yes"), choice("yn", "yes")]);
    let build = build_from_rows(&workbook).unwrap();
    assert_eq!(
        build.warnings,
        vec![Warning::DuplicateChoice {
            list: "yn".into(),
            choice: "yes".into()
        }]
    );
}

#[test]
fn dangling_list_is_fatal() {
    let workbook = Workbook::new(vec![row("text", "a"), row("select_one colors", "color")]);
    let err = build_from_rows(&workbook).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::DanglingChoiceList { ref question, ref list } if question == "color" && list == "colors"
    ));
    assert_eq!(err.row(), Some(3));
}

// =============================================================================
// Fatal Errors
// =============================================================================

#[test]
fn mismatched_closer_points_at_row() {
    let workbook = Workbook::new(vec![
        row("begin group", "g"),
        row("text", "q"),
        end("end repeat"),
    ]);
    let err = build_from_rows(&workbook).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Structure { .. }));
    assert_eq!(err.row(), Some(4));
    assert!(format!("{err}").contains("at survey:4"));
}

#[test]
fn unterminated_repeat() {
    let workbook = Workbook::new(vec![row("begin repeat", "r"), row("text", "q")]);
    let err = build_from_rows(&workbook).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnterminatedGroup { .. }));
    assert_eq!(err.node(), Some("r"));
}

#[test]
fn unknown_type_names_token() {
    let workbook = Workbook::new(vec![row("text", "a"), row("slider", "b")]);
    let err = build_from_rows(&workbook).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownType(ref t) if t == "slider"));
    assert_eq!(err.row(), Some(3));
}

#[test]
fn duplicate_name_across_groups() {
    let workbook = Workbook::new(vec![
        row("text", "name"),
        row("begin group", "g"),
        row("text", "name"),
        end("end group"),
    ]);
    let err = build_from_rows(&workbook).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateName(ref n) if n == "name"));
    assert_eq!(err.row(), Some(4));
}

#[test]
fn unresolved_reference_points_at_owner() {
    let workbook = Workbook::new(vec![
        row("integer", "age"),
        row("text", "job").with("relevant", "${agee} > 18"),
    ]);
    let err = build_from_rows(&workbook).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedReference { ref name, .. } if name == "agee"));
    assert_eq!(err.node(), Some("job"));
    assert_eq!(err.row(), Some(3));
}

#[test]
fn expression_syntax_error() {
    let workbook = Workbook::new(vec![row("integer", "n").with("constraint", ". >")]);
    let err = build_from_rows(&workbook).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ExpressionSyntax { .. }));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn unknown_columns_depend_on_strictness() {
    let workbook = Workbook::new(vec![row("text", "q").with("media::image", "a.png")]);
    let err = build_from_rows(&workbook).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedRow(_)));

    let doc = build_from_rows_with_config(&workbook, &BuildConfig::lenient()).unwrap();
    assert_eq!(doc.document.walk().len(), 1);
}

#[test]
fn required_spellings() {
    for (value, expected) in [("yes", true), ("TRUE", true), ("true()", true), ("no", false), ("0", false)] {
        let workbook = Workbook::new(vec![row("text", "q").with("required", value)]);
        let doc = build_from_rows(&workbook).unwrap().document;
        let q = doc.children().next().unwrap().as_question().unwrap();
        assert_eq!(q.required, expected, "{value}");
    }
    let workbook = Workbook::new(vec![row("text", "q").with("required", "maybe")]);
    assert!(matches!(
        build_from_rows(&workbook).unwrap_err().kind,
        ErrorKind::MalformedRow(_)
    ));
}

#[test]
fn settings_row_fills_settings() {
    let workbook = Workbook::new(vec![row("geopoint", "where")]).with_settings(
        Row::new()
            .with("form_title", "Field visit")
            .with("form_id", "visit")
            .with("version", "2024010101")
            .with("name", "visit"),
    );
    let doc = build_from_rows(&workbook).unwrap().document;
    assert_eq!(doc.root_name(), "visit");
    assert_eq!(doc.settings().form_id.as_deref(), Some("visit"));
    assert_eq!(
        doc.children().next().unwrap().as_question().unwrap().qtype,
        CanonicalType::Geopoint
    );
}
