//! Semi-structured node representation.
//!
//! This module provides the tagged tree that every loader produces and every
//! introspection routine consumes. A document is a `Node`: a scalar leaf, an
//! ordered mapping of unique keys, or an ordered sequence. Parser-specific
//! dynamic values (`serde_json::Value`, `serde_yaml::Value`, XML events) are
//! converted into this shape once, so traversal code can match exhaustively.
//!
//! # Example
//!
//! ```
//! use treelens::document::node::{Node, Scalar};
//! use indexmap::IndexMap;
//!
//! let mut person = IndexMap::new();
//! person.insert("name".to_string(), Node::from("Ana"));
//! person.insert("age".to_string(), Node::from(31));
//! let root = Node::Mapping(person);
//!
//! assert!(root.is_container());
//! assert_eq!(root.child_count(), 2);
//! assert_eq!(root.as_mapping().unwrap()["age"], Node::Scalar(Scalar::Integer(31)));
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// The kind of a node, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    String,
    Integer,
    Float,
    Boolean,
    Null,
    Mapping,
    Sequence,
}

impl NodeKind {
    /// Returns the lowercase name printed in structural reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::String => "string",
            NodeKind::Integer => "integer",
            NodeKind::Float => "float",
            NodeKind::Boolean => "boolean",
            NodeKind::Null => "null",
            NodeKind::Mapping => "mapping",
            NodeKind::Sequence => "sequence",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Mapping | NodeKind::Sequence)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A leaf value.
///
/// Serializes untagged, so a flattened map of scalars exports as plain JSON
/// values (`"Ana"`, `31`, `null`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl Scalar {
    pub fn kind(&self) -> NodeKind {
        match self {
            Scalar::String(_) => NodeKind::String,
            Scalar::Integer(_) => NodeKind::Integer,
            Scalar::Float(_) => NodeKind::Float,
            Scalar::Boolean(_) => NodeKind::Boolean,
            Scalar::Null => NodeKind::Null,
        }
    }

    /// Renders the scalar the way a reader expects to see it in a report:
    /// strings quoted and escaped, everything else in literal form.
    pub fn preview(&self) -> String {
        match self {
            Scalar::String(s) => format!("{:?}", s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Integer(i) => write!(f, "{}", i),
            // Debug keeps the fractional part, so 2.0 stays distinguishable from 2
            Scalar::Float(fl) => write!(f, "{:?}", fl),
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Null => f.write_str("null"),
        }
    }
}

/// One position in a semi-structured tree.
///
/// Mapping keys are unique and keep insertion order; sequences keep document
/// order. A node owns its children, so every tree is finite and acyclic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// A leaf value
    Scalar(Scalar),
    /// Key/value pairs in insertion order
    Mapping(IndexMap<String, Node>),
    /// Ordered elements
    Sequence(Vec<Node>),
}

impl Node {
    /// Returns the kind of this node.
    ///
    /// # Example
    ///
    /// ```
    /// use treelens::document::node::{Node, NodeKind};
    ///
    /// assert_eq!(Node::from(1.5).kind(), NodeKind::Float);
    /// assert_eq!(Node::Sequence(vec![]).kind(), NodeKind::Sequence);
    /// ```
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar(scalar) => scalar.kind(),
            Node::Mapping(_) => NodeKind::Mapping,
            Node::Sequence(_) => NodeKind::Sequence,
        }
    }

    /// Returns true for mappings and sequences.
    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Number of immediate children; zero for scalars.
    pub fn child_count(&self) -> usize {
        match self {
            Node::Scalar(_) => 0,
            Node::Mapping(entries) => entries.len(),
            Node::Sequence(elements) => elements.len(),
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(elements) => Some(elements),
            _ => None,
        }
    }

    /// An empty mapping, the shape of an XML element with no content.
    pub fn empty_mapping() -> Self {
        Node::Mapping(IndexMap::new())
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::String(s))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Node::Scalar(Scalar::Integer(i))
    }
}

impl From<i32> for Node {
    fn from(i: i32) -> Self {
        Node::Scalar(Scalar::Integer(i64::from(i)))
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        Node::Scalar(Scalar::Float(f))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Boolean(b))
    }
}

impl From<Vec<Node>> for Node {
    fn from(elements: Vec<Node>) -> Self {
        Node::Sequence(elements)
    }
}

impl From<IndexMap<String, Node>> for Node {
    fn from(entries: IndexMap<String, Node>) -> Self {
        Node::Mapping(entries)
    }
}
