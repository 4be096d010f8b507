//! Integration tests for the expression parser
//!
//! Tests the grammar and the restricted function set.

use surveyform_expression::{Expr, NodeRef, parse};
use surveyform_foundation::ErrorKind;

// =============================================================================
// Grammar
// =============================================================================

#[test]
fn parses_boolean_comparison() {
    let expr = parse("${age} >= 18 and selected(${pets}, 'dog')").unwrap();
    assert!(matches!(expr, Expr::Binary { .. }));
    assert_eq!(expr.calls(), vec!["selected"]);
}

#[test]
fn collects_references_in_source_order() {
    let expr = parse("${a} + ../b * /data/c").unwrap();
    let refs: Vec<String> = expr
        .node_refs()
        .into_iter()
        .map(|r| match r {
            NodeRef::Name(name, _) => format!("name:{name}"),
            NodeRef::Path(path, _) => format!("path:{path}"),
        })
        .collect();
    assert_eq!(refs, vec!["name:a", "path:../b", "path:/data/c"]);
}

#[test]
fn div_and_mod_are_operators() {
    assert!(parse("${total} div 2 mod 3").is_ok());
}

#[test]
fn string_literals_hide_references() {
    let expr = parse("concat('${not}', ${yes})").unwrap();
    assert_eq!(expr.node_refs().len(), 1);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn unknown_function_is_syntax_error() {
    let err = parse("sqrt(${x})").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ExpressionSyntax { .. }));
}

#[test]
fn wrong_arity_is_syntax_error() {
    let err = parse("selected(${x})").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ExpressionSyntax { .. }));
}

#[test]
fn unbalanced_parens_report_column() {
    let err = parse("(${a} + 1").unwrap_err();
    let ErrorKind::ExpressionSyntax { column, .. } = err.kind else {
        panic!("expected syntax error, got {err}");
    };
    assert!(column >= 1);
}
