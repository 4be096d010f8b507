//! Translation between flat-name and tree-relative expression syntax.
//!
//! Authors write `${income} > 1000`; the tree form is XPath relative to the
//! node that owns the expression, e.g. `../income > 1000` at top level or
//! `../../income > 1000` inside a group. Rewriting replaces only the spans of
//! references and copies every other byte of the source, so translating a
//! canonical expression again is a no-op and the inverse restores the
//! author's text exactly.

use std::collections::BTreeSet;

use surveyform_foundation::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::NodeRef;
use crate::lexer::is_node_char;
use crate::parser;
use crate::path::{NodePath, ReferenceScope};
use crate::symbols::SymbolTable;

/// A compiled expression.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expression {
    /// Flat-name source text, as authored.
    source: String,
    /// Tree-relative form.
    canonical: String,
    /// Resolved references in source order.
    references: Vec<ResolvedReference>,
}

impl Expression {
    /// Returns the flat-name source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the tree-relative form.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Returns every resolved reference in source order.
    #[must_use]
    pub fn references(&self) -> &[ResolvedReference] {
        &self.references
    }

    /// Returns the set of referenced node names.
    #[must_use]
    pub fn referenced_names(&self) -> BTreeSet<&str> {
        self.references.iter().map(|r| r.name.as_str()).collect()
    }
}

/// One reference after resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedReference {
    /// The referenced node's name.
    pub name: String,
    /// Canonical relative path to it.
    pub path: String,
    /// How the path reaches it.
    pub scope: ReferenceScope,
}

/// Rewrites expressions against a symbol table.
#[derive(Clone, Copy, Debug)]
pub struct Translator<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> Translator<'a> {
    /// Creates a translator over a complete symbol table.
    #[must_use]
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }

    /// Compiles flat-name source for the node at `context`.
    ///
    /// `${name}` references and absolute paths become canonical relative
    /// paths; relative paths are normalized; `.` is left alone.
    ///
    /// # Errors
    /// Returns `ExpressionSyntax` if the source does not parse and
    /// `UnresolvedReference` if any reference names no node.
    pub fn translate(&self, source: &str, context: &NodePath) -> Result<Expression> {
        let ast = parser::parse(source)?;
        let mut canonical = String::with_capacity(source.len());
        let mut cursor = 0;
        let mut references = Vec::new();

        for node_ref in ast.node_refs() {
            let target = match node_ref {
                NodeRef::Name(name, _) => {
                    let symbol = self
                        .symbols
                        .lookup(name)
                        .ok_or_else(|| Error::unresolved_reference(name, source))?;
                    symbol.path.clone()
                }
                NodeRef::Path(path, _) => match self.resolve_path(path, context, source)? {
                    Some(target) => target,
                    None => continue,
                },
            };

            let name = self
                .symbols
                .name_at(&target)
                .ok_or_else(|| Error::unresolved_reference(target.to_string(), source))?;
            let relative = context.relative_to(&target);

            let span = node_ref.span();
            canonical.push_str(&source[cursor..span.start]);
            // A path would absorb neighbouring name characters (`a-1`), so
            // keep it apart from them.
            if canonical.chars().next_back().is_some_and(is_node_char) {
                canonical.push(' ');
            }
            canonical.push_str(&relative.text);
            if source[span.end..].chars().next().is_some_and(is_node_char) {
                canonical.push(' ');
            }
            cursor = span.end;

            references.push(ResolvedReference {
                name: name.to_string(),
                path: relative.text,
                scope: relative.scope,
            });
        }
        canonical.push_str(&source[cursor..]);

        Ok(Expression {
            source: source.to_string(),
            canonical,
            references,
        })
    }

    /// Rewrites a tree-form expression back to flat-name syntax.
    ///
    /// # Errors
    /// Returns `ExpressionSyntax` if the text does not parse and
    /// `UnresolvedReference` if a path names no node.
    pub fn to_flat(&self, canonical: &str, context: &NodePath) -> Result<String> {
        let ast = parser::parse(canonical)?;
        let mut flat = String::with_capacity(canonical.len());
        let mut cursor = 0;

        for node_ref in ast.node_refs() {
            let NodeRef::Path(path, span) = node_ref else {
                continue;
            };
            let Some(target) = self.resolve_path(path, context, canonical)? else {
                continue;
            };
            let name = self
                .symbols
                .name_at(&target)
                .ok_or_else(|| Error::unresolved_reference(path, canonical))?;

            flat.push_str(&canonical[cursor..span.start]);
            flat.push_str("${");
            flat.push_str(name);
            flat.push('}');
            cursor = span.end;
        }
        flat.push_str(&canonical[cursor..]);

        Ok(flat)
    }

    /// Compiles an expression read from a tree, recovering its flat source.
    ///
    /// # Errors
    /// Same as [`Translator::translate`].
    pub fn translate_tree(&self, text: &str, context: &NodePath) -> Result<Expression> {
        let compiled = self.translate(text, context)?;
        let source = self.to_flat(compiled.canonical(), context)?;
        Ok(Expression { source, ..compiled })
    }

    /// Resolves a path token to the node it names.
    ///
    /// Returns `Ok(None)` for paths that name no declared node on purpose:
    /// `.` (the owning node) and the survey root.
    fn resolve_path(
        &self,
        path: &str,
        context: &NodePath,
        source: &str,
    ) -> Result<Option<NodePath>> {
        if path == "." {
            return Ok(None);
        }
        let target = if path.starts_with('/') {
            NodePath::parse_absolute(path, self.symbols.root())
        } else {
            context.resolve(path)
        };
        match target {
            Some(target) if target.is_root() => Ok(None),
            Some(target) => Ok(Some(target)),
            None => Err(Error::unresolved_reference(path, source)),
        }
    }
}
