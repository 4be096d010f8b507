//! Integration tests for Layer 3: Builder
//!
//! Tests building documents from rows and from XForm trees, including every
//! fatal error kind and where it points.

mod rows;
