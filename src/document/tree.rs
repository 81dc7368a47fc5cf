//! Loaded documents and path-based lookup.
//!
//! This module provides the `Document` type: a root `Node` together with the
//! format it was parsed from. Nodes inside a document are addressed with a
//! `Path`, so a caller can describe or flatten a subtree instead of the whole
//! document.
//!
//! # Example
//!
//! ```
//! use treelens::document::tree::{Document, SourceFormat};
//! use treelens::document::node::Node;
//! use treelens::document::path::Path;
//! use indexmap::IndexMap;
//!
//! let mut person = IndexMap::new();
//! person.insert("tags".to_string(), Node::Sequence(vec![Node::from("x"), Node::from("y")]));
//! let doc = Document::new(Node::Mapping(person), SourceFormat::Json);
//!
//! let tag = doc.get(&Path::root().key("tags").index(1)).unwrap();
//! assert_eq!(tag, &Node::from("y"));
//! ```

use super::node::Node;
use super::path::{Path, PathSegment};
use std::fmt;

/// The syntax a document was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Json,
    /// Newline-delimited JSON; the root is a sequence with one element per line
    JsonLines,
    Yaml,
    Xml,
}

impl SourceFormat {
    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Json => "JSON",
            SourceFormat::JsonLines => "JSON Lines",
            SourceFormat::Yaml => "YAML",
            SourceFormat::Xml => "XML",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
    format: SourceFormat,
}

impl Document {
    pub fn new(root: Node, format: SourceFormat) -> Self {
        Self { root, format }
    }

    /// Returns a reference to the root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// Gets the node at `path`.
    ///
    /// Returns `None` if:
    /// - A key segment is applied to something other than a mapping, or the key is absent
    /// - An index segment is applied to something other than a sequence, or is out of bounds
    pub fn get(&self, path: &Path) -> Option<&Node> {
        let mut current = &self.root;

        for segment in path.segments() {
            current = match (segment, current) {
                (PathSegment::Key(key), Node::Mapping(entries)) => entries.get(key)?,
                (PathSegment::Index(index), Node::Sequence(elements)) => elements.get(*index)?,
                _ => return None,
            };
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn sample() -> Document {
        let mut inner = IndexMap::new();
        inner.insert("b".to_string(), Node::from(1));
        let mut root = IndexMap::new();
        root.insert("a".to_string(), Node::Mapping(inner));
        root.insert(
            "list".to_string(),
            Node::Sequence(vec![Node::from("x"), Node::from("y")]),
        );
        Document::new(Node::Mapping(root), SourceFormat::Yaml)
    }

    #[test]
    fn test_get_root() {
        let doc = sample();
        assert_eq!(doc.get(&Path::root()), Some(doc.root()));
    }

    #[test]
    fn test_get_nested() {
        let doc = sample();
        assert_eq!(doc.get(&Path::root().key("a").key("b")), Some(&Node::from(1)));
        assert_eq!(doc.get(&Path::root().key("list").index(1)), Some(&Node::from("y")));
    }

    #[test]
    fn test_get_mismatched_segment() {
        let doc = sample();
        assert!(doc.get(&Path::root().index(0)).is_none());
        assert!(doc.get(&Path::root().key("list").key("x")).is_none());
        assert!(doc.get(&Path::root().key("list").index(9)).is_none());
        assert!(doc.get(&Path::root().key("missing")).is_none());
    }

    #[test]
    fn test_format_names() {
        assert_eq!(SourceFormat::JsonLines.to_string(), "JSON Lines");
        assert_eq!(sample().format(), SourceFormat::Yaml);
    }
}
