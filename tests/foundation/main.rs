//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Error, CanonicalType aliases, Row, and XmlNode.

mod aliases;
mod errors;
mod rows;
