//! Integration tests for rows and XML trees
//!
//! Tests the tabular and hierarchical input representations.

use surveyform_foundation::{Row, Text, Workbook, XmlNode, split_language};

// =============================================================================
// Rows
// =============================================================================

#[test]
fn blank_cells_are_absent() {
    let row = Row::new().with("type", "text").with("hint", "   ");
    assert_eq!(row.get("hint"), None);
    assert!(!row.is_blank());
    assert!(Row::new().with("label", "").is_blank());
}

#[test]
fn cells_keep_insertion_order() {
    let row: Row = [("type", "text"), ("name", "q"), ("label", "Q")]
        .into_iter()
        .collect();
    let columns: Vec<_> = row.cells().map(|(c, _)| c).collect();
    assert_eq!(columns, vec!["type", "name", "label"]);
}

#[test]
fn language_columns_split() {
    assert_eq!(split_language("label::Français"), ("label", Some("Français")));
    assert_eq!(split_language("hint"), ("hint", None));
}

#[test]
fn workbook_builder() {
    let workbook = Workbook::new(vec![Row::new().with("type", "text")])
        .with_settings(Row::new().with("form_id", "f"));
    assert!(workbook.choices.is_empty());
    assert_eq!(workbook.settings.unwrap().get("form_id"), Some("f"));
}

// =============================================================================
// Text
// =============================================================================

#[test]
fn text_ignores_empty_values() {
    let text = Text::plain("Hello").with("fr", "").with("es", "Hola");
    assert_eq!(text.default_text(), Some("Hello"));
    assert_eq!(text.get("fr"), None);
    assert!(text.is_translated());
}

// =============================================================================
// XML Trees
// =============================================================================

#[test]
fn xml_local_names_and_text() {
    let node = XmlNode::new("h:title").with_text("  Census \n");
    assert_eq!(node.local_name(), "title");
    assert_eq!(node.text(), Some("Census"));
    assert_eq!(XmlNode::new("x").with_text("  ").text(), None);
}
