//! Integration tests for Layer 1: Expression
//!
//! Tests parsing of survey logic and translation between flat names and
//! tree-relative paths.

mod parsing;
