//! Abstract syntax tree for survey logic expressions.

use std::fmt;

use crate::span::Span;

/// Binary operators, loosest-binding first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// `or`
    Or,
    /// `and`
    And,
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `div`
    Div,
    /// `mod`
    Mod,
    /// `|`
    Union,
}

impl BinaryOp {
    /// Returns the operator as written in source.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Union => "|",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An expression AST node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Number literal, kept as written.
    Number(String, Span),
    /// String literal, without quotes.
    String(String, Span),
    /// `${name}` reference.
    Reference(String, Span),
    /// Tree path such as `../income`.
    Path(String, Span),
    /// Function call.
    Call {
        /// Function name.
        name: String,
        /// Arguments in order.
        args: Vec<Expr>,
        /// Span from the name through the closing parenthesis.
        span: Span,
    },
    /// Binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
        /// Span covering both operands.
        span: Span,
    },
    /// Unary minus.
    Negate(Box<Expr>, Span),
    /// Parenthesized expression.
    Group(Box<Expr>, Span),
}

impl Expr {
    /// Returns the source span of this node.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Number(_, s)
            | Self::String(_, s)
            | Self::Reference(_, s)
            | Self::Path(_, s)
            | Self::Negate(_, s)
            | Self::Group(_, s)
            | Self::Call { span: s, .. }
            | Self::Binary { span: s, .. } => *s,
        }
    }

    /// Visits this node and all descendants in source order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        match self {
            Self::Call { args, .. } => {
                for arg in args {
                    arg.walk(visit);
                }
            }
            Self::Binary { lhs, rhs, .. } => {
                lhs.walk(visit);
                rhs.walk(visit);
            }
            Self::Negate(inner, _) | Self::Group(inner, _) => inner.walk(visit),
            Self::Number(..) | Self::String(..) | Self::Reference(..) | Self::Path(..) => {}
        }
    }

    /// Collects every `${name}` reference and path in source order.
    #[must_use]
    pub fn node_refs(&self) -> Vec<NodeRef<'_>> {
        let mut refs = Vec::new();
        self.walk(&mut |expr| match expr {
            Self::Reference(name, span) => refs.push(NodeRef::Name(name, *span)),
            Self::Path(path, span) => refs.push(NodeRef::Path(path, *span)),
            _ => {}
        });
        refs
    }

    /// Returns the called function names in source order.
    #[must_use]
    pub fn calls(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.walk(&mut |expr| {
            if let Self::Call { name, .. } = expr {
                names.push(name.as_str());
            }
        });
        names
    }
}

/// A place in an expression that names a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRef<'a> {
    /// `${name}`
    Name(&'a str, Span),
    /// A tree path.
    Path(&'a str, Span),
}

impl NodeRef<'_> {
    /// Returns the source span of the reference.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Name(_, s) | Self::Path(_, s) => *s,
        }
    }
}
