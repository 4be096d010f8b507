//! The survey document.
//!
//! A [`SurveyDocument`] is assembled once and is read-only afterwards.
//! [`SurveyDocument::new`] enforces the document invariants, so every value
//! of this type has unique names and resolvable choice lists.

use std::collections::{BTreeSet, HashSet};

use surveyform_expression::{NodePath, SymbolKind, SymbolTable};
use surveyform_foundation::{DEFAULT_LANGUAGE, Error, ErrorContext, Result, Text};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::choice::{ChoiceList, ChoiceLists};
use crate::node::{Container, Node};

/// Document-level settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    /// Form title.
    pub title: Option<String>,
    /// Form identifier.
    pub form_id: Option<String>,
    /// Form version string.
    pub version: Option<String>,
    /// Language shown when the client has no preference.
    pub default_language: Option<String>,
    /// Where submissions are sent.
    pub submission_url: Option<String>,
}

impl Settings {
    /// Returns true if no setting is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A node reached during a walk, with its path from the root.
#[derive(Clone, Debug)]
pub struct Visit<'a> {
    /// Path from the root to the node.
    pub path: NodePath,
    /// The node.
    pub node: &'a Node,
}

/// A complete survey: node tree, choice lists and settings.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurveyDocument {
    root: Node,
    choices: ChoiceLists,
    settings: Settings,
}

impl SurveyDocument {
    /// Assembles a document from its root container.
    ///
    /// # Errors
    /// Returns `DuplicateName` if two nodes share a name and
    /// `DanglingChoiceList` if a select question names a missing or empty list.
    pub fn new(root: Container, choices: ChoiceLists, settings: Settings) -> Result<Self> {
        let document = Self {
            root: Node::Survey(root),
            choices,
            settings,
        };
        document.symbols()?;
        document.check_choice_lists()?;
        Ok(document)
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Returns the root instance element name.
    #[must_use]
    pub fn root_name(&self) -> &str {
        self.root.name()
    }

    /// Returns the top-level nodes.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.root.children()
    }

    /// Returns every choice list, referenced or not.
    #[must_use]
    pub fn choices(&self) -> &ChoiceLists {
        &self.choices
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Visits every node below the root in document order.
    #[must_use]
    pub fn walk(&self) -> Vec<Visit<'_>> {
        let mut visits = Vec::new();
        let mut stack: Vec<(NodePath, &Node)> = self
            .children()
            .map(|child| (NodePath::root().child(child.name()), child))
            .collect();
        stack.reverse();

        while let Some((path, node)) = stack.pop() {
            let start = stack.len();
            for child in node.children() {
                stack.push((path.child(child.name()), child));
            }
            stack[start..].reverse();
            visits.push(Visit { path, node });
        }
        visits
    }

    /// Rebuilds the symbol table for this document.
    ///
    /// # Errors
    /// Returns `DuplicateName` if two nodes share a name.
    pub fn symbols(&self) -> Result<SymbolTable> {
        let mut table = SymbolTable::new(self.root_name());
        for visit in self.walk() {
            let kind = match visit.node {
                Node::Group(_) => SymbolKind::Group,
                Node::Repeat(_) => SymbolKind::Repeat,
                Node::Question(_) | Node::Survey(_) => SymbolKind::Question,
            };
            let name = visit.node.name().to_string();
            table
                .declare(visit.path, kind)
                .map_err(|e| e.or_context(ErrorContext::new().with_node(name)))?;
        }
        Ok(table)
    }

    /// Returns the names of lists used by select questions.
    #[must_use]
    pub fn referenced_list_names(&self) -> HashSet<&str> {
        self.walk()
            .into_iter()
            .filter_map(|visit| visit.node.as_question()?.list_name.as_deref())
            .collect()
    }

    /// Returns the referenced lists in list order.
    #[must_use]
    pub fn referenced_lists(&self) -> Vec<&ChoiceList> {
        let referenced = self.referenced_list_names();
        self.choices
            .values()
            .filter(|list| referenced.contains(list.name.as_str()))
            .collect()
    }

    /// Returns the names of lists no question uses.
    #[must_use]
    pub fn unreferenced_list_names(&self) -> Vec<&str> {
        let referenced = self.referenced_list_names();
        self.choices
            .keys()
            .map(String::as_str)
            .filter(|name| !referenced.contains(name))
            .collect()
    }

    /// Returns every language used by a node text or a referenced choice.
    #[must_use]
    pub fn languages(&self) -> BTreeSet<&str> {
        let mut languages = BTreeSet::new();
        for visit in self.walk() {
            for text in node_texts(visit.node) {
                languages.extend(text.languages());
            }
        }
        for list in self.referenced_lists() {
            for choice in &list.choices {
                languages.extend(choice.label.languages());
            }
        }
        languages
    }

    /// Returns true if any text carries a language other than the default.
    #[must_use]
    pub fn is_translated(&self) -> bool {
        self.languages()
            .into_iter()
            .any(|language| language != DEFAULT_LANGUAGE)
    }

    fn check_choice_lists(&self) -> Result<()> {
        for visit in self.walk() {
            let Some(question) = visit.node.as_question() else {
                continue;
            };
            if !question.qtype.is_select() {
                continue;
            }
            let list = question.list_name.as_deref().unwrap_or_default();
            let linked = self.choices.get(list).is_some_and(|l| !l.is_empty());
            if !linked {
                return Err(Error::dangling_choice_list(&question.name, list)
                    .with_context(ErrorContext::new().with_node(&question.name)));
            }
        }
        Ok(())
    }
}

fn node_texts(node: &Node) -> Vec<&Text> {
    match node {
        Node::Question(q) => vec![&q.label, &q.hint, &q.constraint_message],
        Node::Group(c) | Node::Repeat(c) | Node::Survey(c) => vec![&c.label, &c.hint],
    }
}
