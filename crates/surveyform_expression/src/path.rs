//! Node paths and relative path arithmetic.
//!
//! A [`NodePath`] is the sequence of names from the survey root (exclusive)
//! down to a node. Relative paths follow XPath rules with the node that owns
//! an expression as the context: `.` is that node, `..` its container.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Path of a node below the survey root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    /// The survey root itself.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from segments.
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Returns the path of a child of this node.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Returns the container path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// Returns the node's own name, or `None` for the root.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the nesting depth (0 for the root).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns true for the survey root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Renders the absolute path below the given root element, e.g. `/data/g/q`.
    #[must_use]
    pub fn absolute(&self, root: &str) -> String {
        let mut out = format!("/{root}");
        for segment in &self.segments {
            out.push('/');
            out.push_str(segment);
        }
        out
    }

    /// Parses an absolute path such as `/data/g/q` rooted at `root`.
    #[must_use]
    pub fn parse_absolute(path: &str, root: &str) -> Option<Self> {
        let rest = path.strip_prefix('/')?;
        let mut steps = rest.split('/');
        if steps.next()? != root {
            return None;
        }
        let segments: Vec<String> = steps.map(String::from).collect();
        if segments
            .iter()
            .any(|s| s.is_empty() || s == "." || s == "..")
        {
            return None;
        }
        Some(Self { segments })
    }

    /// Resolves a relative path with this node as the context node.
    ///
    /// Returns `None` if the path climbs above the root or is absolute.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> Option<Self> {
        if relative.starts_with('/') {
            return None;
        }
        let mut segments = self.segments.clone();
        for step in relative.split('/') {
            match step {
                "." => {}
                ".." => {
                    segments.pop()?;
                }
                "" => return None,
                name => segments.push(name.to_string()),
            }
        }
        Some(Self { segments })
    }

    /// Computes the canonical relative path from this node to `target`.
    ///
    /// A node referring to itself gets `../name` rather than `.`, so the
    /// reference survives the inverse translation by name.
    #[must_use]
    pub fn relative_to(&self, target: &NodePath) -> RelativePath {
        let common = self
            .segments
            .iter()
            .zip(&target.segments)
            .take_while(|(a, b)| a == b)
            .count();

        let (ups, rest) = if common == self.depth() && common == target.depth() {
            (1, &target.segments[common.saturating_sub(1)..])
        } else if common == self.depth() {
            (0, &target.segments[common..])
        } else {
            (self.depth() - common, &target.segments[common..])
        };

        let mut text = if ups == 0 {
            String::from("./")
        } else {
            "../".repeat(ups)
        };
        text.push_str(&rest.join("/"));

        let scope = match ups {
            0 => ReferenceScope::Descendant,
            1 => ReferenceScope::Local,
            n => ReferenceScope::Ancestor { levels: n - 1 },
        };
        RelativePath { text, scope }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// How a reference reaches its target from the referring node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReferenceScope {
    /// The target lives in the same container as the referring node.
    Local,
    /// The target lives in an enclosing container `levels` above.
    Ancestor {
        /// Containers climbed beyond the referring node's own.
        levels: usize,
    },
    /// The target lives inside the referring node (a group or repeat).
    Descendant,
}

/// A computed relative path and its scope classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelativePath {
    /// Path text, e.g. `../../income`.
    pub text: String,
    /// Scope classification.
    pub scope: ReferenceScope,
}
