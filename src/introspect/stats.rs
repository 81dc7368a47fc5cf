//! Whole-tree statistics.

use crate::document::node::Node;
use serde::Serialize;

/// Counts and depth of a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    /// All nodes, including the root
    pub nodes: usize,
    pub scalars: usize,
    pub mappings: usize,
    pub sequences: usize,
    /// Container boundaries crossed on the longest root-to-leaf walk
    pub max_depth: usize,
}

/// Computes statistics for the tree rooted at `node`.
///
/// Depth counts container boundaries: a scalar root has depth 0, `{"a": 1}`
/// has depth 1, and an empty container counts as one boundary.
///
/// # Example
///
/// ```
/// use treelens::document::parser::parse_json;
/// use treelens::introspect::stats;
///
/// let doc = parse_json(r#"{"a": [1, {"b": true}], "c": null}"#).unwrap();
/// let s = stats(doc.root());
/// assert_eq!(s.scalars, 3);
/// assert_eq!(s.mappings, 2);
/// assert_eq!(s.sequences, 1);
/// assert_eq!(s.max_depth, 3);
/// ```
pub fn stats(node: &Node) -> TreeStats {
    let mut stats = TreeStats::default();
    // (node, container boundaries above it)
    let mut stack = vec![(node, 0usize)];

    while let Some((current, above)) = stack.pop() {
        stats.nodes += 1;
        match current {
            Node::Scalar(_) => {
                stats.scalars += 1;
                stats.max_depth = stats.max_depth.max(above);
            }
            Node::Mapping(entries) => {
                stats.mappings += 1;
                stats.max_depth = stats.max_depth.max(above + 1);
                stack.extend(entries.values().map(|child| (child, above + 1)));
            }
            Node::Sequence(elements) => {
                stats.sequences += 1;
                stats.max_depth = stats.max_depth.max(above + 1);
                stack.extend(elements.iter().map(|child| (child, above + 1)));
            }
        }
    }

    stats
}

/// Depth of the tree rooted at `node`.
pub fn depth(node: &Node) -> usize {
    stats(node).max_depth
}

/// Number of scalar leaves under `node`.
pub fn leaf_count(node: &Node) -> usize {
    stats(node).scalars
}
