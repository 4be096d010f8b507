//! Symbol table for the flat survey namespace.
//!
//! Names are unique across the whole document regardless of nesting, so a
//! bare name identifies exactly one node. The builder fills the table as it
//! consumes rows and hands it to the translator; it is dropped once the
//! document is assembled.

use std::collections::HashMap;

use surveyform_foundation::{Error, Result};

use crate::path::NodePath;

/// What kind of node a symbol names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    /// A question.
    Question,
    /// A group.
    Group,
    /// A repeat.
    Repeat,
}

/// A declared name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    /// Where the node lives.
    pub path: NodePath,
    /// What the node is.
    pub kind: SymbolKind,
}

/// Maps every node name to its path.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    /// Name of the root instance element, used for absolute paths.
    root: String,
    /// Declared names.
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    /// Creates an empty table for a survey whose root element is `root`.
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            symbols: HashMap::new(),
        }
    }

    /// Returns the root element name.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Declares a node at `path`; its name is the last path segment.
    ///
    /// # Errors
    /// Returns `DuplicateName` if the name is already declared anywhere, and
    /// `Structure` if `path` is the root.
    pub fn declare(&mut self, path: NodePath, kind: SymbolKind) -> Result<()> {
        let Some(name) = path.name().map(str::to_string) else {
            return Err(Error::structure("cannot declare the survey root"));
        };
        if self.symbols.contains_key(&name) {
            return Err(Error::duplicate_name(name));
        }
        self.symbols.insert(name, Symbol { path, kind });
        Ok(())
    }

    /// Looks up a name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Returns the name of the node at `path`, if one is declared there.
    #[must_use]
    pub fn name_at(&self, path: &NodePath) -> Option<&str> {
        let name = path.name()?;
        let (key, symbol) = self.symbols.get_key_value(name)?;
        (symbol.path == *path).then_some(key.as_str())
    }

    /// Returns true if no names are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the number of declared names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }
}
