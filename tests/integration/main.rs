//! Cross-layer integration tests for surveyform
//!
//! Tests that building and emitting in either direction preserve documents.

mod properties;
mod round_trip;
