//! Survey nodes.
//!
//! A survey is a tree: the [`Node::Survey`] root holds groups, repeats and
//! questions in author order. Children live in persistent vectors so a
//! finished document is cheap to clone and never mutated in place.

use std::fmt;

use im::Vector;
use surveyform_expression::Expression;
use surveyform_foundation::{CanonicalType, Text};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeKind {
    /// A leaf question.
    Question,
    /// A group of nodes shown together.
    Group,
    /// A group answered zero or more times.
    Repeat,
    /// The document root.
    Survey,
}

impl NodeKind {
    /// Returns the lowercase kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Group => "group",
            Self::Repeat => "repeat",
            Self::Survey => "survey",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node in the survey tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Node {
    /// A leaf question.
    Question(Question),
    /// A group.
    Group(Container),
    /// A repeat.
    Repeat(Container),
    /// The document root.
    Survey(Container),
}

impl Node {
    /// Returns the node kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Question(_) => NodeKind::Question,
            Self::Group(_) => NodeKind::Group,
            Self::Repeat(_) => NodeKind::Repeat,
            Self::Survey(_) => NodeKind::Survey,
        }
    }

    /// Returns the node name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Question(q) => &q.name,
            Self::Group(c) | Self::Repeat(c) | Self::Survey(c) => &c.name,
        }
    }

    /// Returns the node label.
    #[must_use]
    pub fn label(&self) -> &Text {
        match self {
            Self::Question(q) => &q.label,
            Self::Group(c) | Self::Repeat(c) | Self::Survey(c) => &c.label,
        }
    }

    /// Returns the node's relevance condition.
    #[must_use]
    pub fn relevant(&self) -> Option<&Expression> {
        match self {
            Self::Question(q) => q.relevant.as_ref(),
            Self::Group(c) | Self::Repeat(c) | Self::Survey(c) => c.relevant.as_ref(),
        }
    }

    /// Returns the question, if this is one.
    #[must_use]
    pub fn as_question(&self) -> Option<&Question> {
        match self {
            Self::Question(q) => Some(q),
            _ => None,
        }
    }

    /// Returns the container, if this is a group, repeat, or the root.
    #[must_use]
    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Self::Question(_) => None,
            Self::Group(c) | Self::Repeat(c) | Self::Survey(c) => Some(c),
        }
    }

    /// Returns the children of a container, or nothing for a question.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.as_container()
            .into_iter()
            .flat_map(|c| c.children.iter())
    }

    /// Returns every expression attached to this node.
    pub fn expressions(&self) -> impl Iterator<Item = &Expression> {
        let (relevant, constraint, calculation) = match self {
            Self::Question(q) => (
                q.relevant.as_ref(),
                q.constraint.as_ref(),
                q.calculation.as_ref(),
            ),
            Self::Group(c) | Self::Repeat(c) | Self::Survey(c) => (c.relevant.as_ref(), None, None),
        };
        relevant.into_iter().chain(constraint).chain(calculation)
    }
}

/// A leaf question.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Question {
    /// Unique name.
    pub name: String,
    /// Canonical type.
    pub qtype: CanonicalType,
    /// Prompt text.
    pub label: Text,
    /// Hint text.
    pub hint: Text,
    /// Whether an answer is mandatory.
    pub required: bool,
    /// Visibility condition.
    pub relevant: Option<Expression>,
    /// Validity condition.
    pub constraint: Option<Expression>,
    /// Message shown when the constraint fails.
    pub constraint_message: Text,
    /// Computed value.
    pub calculation: Option<Expression>,
    /// Default answer.
    pub default: Option<String>,
    /// Display hint for the client.
    pub appearance: Option<String>,
    /// Choice list for select types.
    pub list_name: Option<String>,
}

impl Question {
    /// Creates a question with no optional fields set.
    #[must_use]
    pub fn new(name: impl Into<String>, qtype: CanonicalType) -> Self {
        Self {
            name: name.into(),
            qtype,
            label: Text::new(),
            hint: Text::new(),
            required: false,
            relevant: None,
            constraint: None,
            constraint_message: Text::new(),
            calculation: None,
            default: None,
            appearance: None,
            list_name: None,
        }
    }
}

/// A group, repeat, or the survey root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Container {
    /// Unique name; for the root, the instance element name.
    pub name: String,
    /// Heading text.
    pub label: Text,
    /// Hint text.
    pub hint: Text,
    /// Visibility condition for the whole container.
    pub relevant: Option<Expression>,
    /// Display hint for the client.
    pub appearance: Option<String>,
    /// Children in author order.
    pub children: Vector<Node>,
}

impl Container {
    /// Creates an empty container.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends a child, returning the container.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push_back(child);
        self
    }
}
