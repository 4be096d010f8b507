//! Structural equality between documents.
//!
//! Two documents are structurally equal when they describe the same survey:
//! same hierarchy and sibling order, same names, types and texts, same
//! canonical logic, and same choices for every list a question uses.
//! Authored expression spelling and unreferenced lists do not count.

use std::collections::BTreeMap;

use surveyform_expression::Expression;

use crate::choice::ChoiceList;
use crate::document::SurveyDocument;
use crate::node::{Container, Node, Question};

/// Returns true if two documents describe the same survey.
#[must_use]
pub fn structural_equals(a: &SurveyDocument, b: &SurveyDocument) -> bool {
    a.root_name() == b.root_name()
        && a.settings() == b.settings()
        && nodes_equal(a.root(), b.root())
        && referenced_lists(a) == referenced_lists(b)
}

fn referenced_lists(doc: &SurveyDocument) -> BTreeMap<&str, &ChoiceList> {
    doc.referenced_lists()
        .into_iter()
        .map(|list| (list.name.as_str(), list))
        .collect()
}

fn nodes_equal(a: &Node, b: &Node) -> bool {
    match (a, b) {
        (Node::Question(a), Node::Question(b)) => questions_equal(a, b),
        (Node::Group(a), Node::Group(b))
        | (Node::Repeat(a), Node::Repeat(b))
        | (Node::Survey(a), Node::Survey(b)) => containers_equal(a, b),
        _ => false,
    }
}

fn containers_equal(a: &Container, b: &Container) -> bool {
    a.name == b.name
        && a.label == b.label
        && a.hint == b.hint
        && a.appearance == b.appearance
        && canonical_equal(a.relevant.as_ref(), b.relevant.as_ref())
        && a.children.len() == b.children.len()
        && a
            .children
            .iter()
            .zip(b.children.iter())
            .all(|(a, b)| nodes_equal(a, b))
}

fn questions_equal(a: &Question, b: &Question) -> bool {
    a.name == b.name
        && a.qtype == b.qtype
        && a.label == b.label
        && a.hint == b.hint
        && a.required == b.required
        && a.default == b.default
        && a.appearance == b.appearance
        && a.constraint_message == b.constraint_message
        && a.list_name == b.list_name
        && canonical_equal(a.relevant.as_ref(), b.relevant.as_ref())
        && canonical_equal(a.constraint.as_ref(), b.constraint.as_ref())
        && canonical_equal(a.calculation.as_ref(), b.calculation.as_ref())
}

fn canonical_equal(a: Option<&Expression>, b: Option<&Expression>) -> bool {
    a.map(Expression::canonical) == b.map(Expression::canonical)
}
