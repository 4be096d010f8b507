//! Immutable survey document model for surveyform.
//!
//! This crate provides:
//! - [`Node`] - Tagged question/group/repeat/survey nodes
//! - [`ChoiceList`] - Named, ordered option lists
//! - [`SurveyDocument`] - The validated document both emitters consume
//! - [`structural_equals`] - Semantic comparison used by round-trip checks

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod choice;
pub mod document;
pub mod equality;
pub mod node;

pub use choice::{Choice, ChoiceList, ChoiceLists};
pub use document::{Settings, SurveyDocument, Visit};
pub use equality::structural_equals;
pub use node::{Container, Node, NodeKind, Question};
