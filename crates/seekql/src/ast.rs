//! Abstract syntax tree produced by the parser.
//!
//! The tree is purely syntactic: field paths are still plain identifiers and
//! literals have not been checked against any schema.

use crate::op::CompareOp;

/// Logical connective of a [`Node::Logical`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
    /// Negation of exactly one child.
    Not,
}

impl LogicalOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
            LogicalOp::Not => "not",
        }
    }
}

impl std::fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Leaf comparison `field.path op value`.
    Comparison(Comparison),
    /// `and`/`or` over two or more children, or `not` over one.
    Logical { op: LogicalOp, children: Vec<Node> },
}

impl Node {
    /// Builds an `and` node.
    pub fn and(children: Vec<Node>) -> Node {
        Node::Logical {
            op: LogicalOp::And,
            children,
        }
    }

    /// Builds an `or` node.
    pub fn or(children: Vec<Node>) -> Node {
        Node::Logical {
            op: LogicalOp::Or,
            children,
        }
    }

    /// Builds a `not` node.
    pub fn not(child: Node) -> Node {
        Node::Logical {
            op: LogicalOp::Not,
            children: vec![child],
        }
    }

    /// Returns the comparison if this node is a leaf.
    pub fn as_comparison(&self) -> Option<&Comparison> {
        match self {
            Node::Comparison(c) => Some(c),
            Node::Logical { .. } => None,
        }
    }
}

/// Leaf comparison of a field path against a literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub path: FieldPath,
    pub op: CompareOp,
    pub value: Literal,
    /// Byte offset of the first path segment.
    pub offset: usize,
}

/// Dot-separated field path, e.g. `author.username`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldPath {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits a dotted string into a path.
    pub fn parse_dotted(path: &str) -> Self {
        FieldPath::new(path.split('.'))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Literal as written in the query.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    /// `[a, b, ...]`; elements may themselves be lists syntactically.
    List(Vec<Literal>),
}

impl Literal {
    /// Short description used in validation messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Literal::String(_) => "string",
            Literal::Integer(_) => "integer",
            Literal::Float(_) => "float",
            Literal::Bool(_) => "boolean",
            Literal::Null => "null",
            Literal::List(_) => "list",
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::String(s) => write!(f, "{s:?}"),
            Literal::Integer(n) => write!(f, "{n}"),
            Literal::Float(n) => write!(f, "{n:?}"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Null => f.write_str("null"),
            Literal::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_path_display() {
        let path = FieldPath::parse_dotted("author.profile.name");
        assert_eq!(path.len(), 3);
        assert_eq!(path.to_string(), "author.profile.name");
    }

    #[test]
    fn literal_display() {
        assert_eq!(Literal::String("a\"b".into()).to_string(), r#""a\"b""#);
        assert_eq!(Literal::Float(2.0).to_string(), "2.0");
        assert_eq!(
            Literal::List(vec![Literal::Integer(1), Literal::Null]).to_string(),
            "[1, null]"
        );
    }

    #[test]
    fn node_builders() {
        let leaf = Node::Comparison(Comparison {
            path: FieldPath::new(["name"]),
            op: CompareOp::Eq,
            value: Literal::Null,
            offset: 0,
        });
        let not = Node::not(leaf.clone());
        match not {
            Node::Logical { op, children } => {
                assert_eq!(op, LogicalOp::Not);
                assert_eq!(children, vec![leaf]);
            }
            _ => panic!("expected logical node"),
        }
    }
}
