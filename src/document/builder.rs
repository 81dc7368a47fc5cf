//! Mapping construction with duplicate-key coalescing.
//!
//! Sources such as XML allow the same child tag to repeat under one parent.
//! `MappingBuilder` folds those repeats into a sequence: the first occurrence
//! is stored as-is, the second turns the entry into `[first, second]`, and
//! later occurrences append. Whether an entry ends up a sequence depends only
//! on how many times its key occurred, never on what the first value was.
//!
//! # Example
//!
//! ```
//! use treelens::document::builder::MappingBuilder;
//! use treelens::document::node::Node;
//!
//! let mut builder = MappingBuilder::new();
//! builder.coalesce_duplicate_key("n", Node::from(10));
//! builder.coalesce_duplicate_key("n", Node::from(20));
//! builder.coalesce_duplicate_key("n", Node::from(30));
//!
//! let node = builder.finish();
//! assert_eq!(
//!     node.as_mapping().unwrap()["n"],
//!     Node::Sequence(vec![Node::from(10), Node::from(20), Node::from(30)])
//! );
//! ```

use super::node::Node;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Accumulates mapping entries, coalescing repeated keys into sequences.
#[derive(Debug, Clone, Default)]
pub struct MappingBuilder {
    entries: IndexMap<String, Node>,
    occurrences: HashMap<String, usize>,
}

impl MappingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` under `key` and returns the entry as it now stands.
    ///
    /// The entry keeps the position of the key's first occurrence.
    pub fn coalesce_duplicate_key(&mut self, key: impl Into<String>, value: Node) -> &Node {
        let key = key.into();
        let count = self.occurrences.entry(key.clone()).or_insert(0);
        *count += 1;
        let count = *count;

        match self.entries.entry(key) {
            Entry::Vacant(slot) => slot.insert(value),
            Entry::Occupied(slot) => {
                let stored = slot.into_mut();
                if count == 2 {
                    let first = std::mem::replace(stored, Node::Sequence(Vec::new()));
                    *stored = Node::Sequence(vec![first, value]);
                } else if let Node::Sequence(items) = &mut *stored {
                    items.push(value);
                }
                stored
            }
        }
    }

    /// How many times `key` has been added so far.
    pub fn occurrences(&self, key: &str) -> usize {
        self.occurrences.get(key).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> IndexMap<String, Node> {
        self.entries
    }

    /// Consumes the builder and returns the finished mapping node.
    pub fn finish(self) -> Node {
        Node::Mapping(self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_occurrence_is_stored_directly() {
        let mut builder = MappingBuilder::new();
        let stored = builder.coalesce_duplicate_key("title", Node::from("Deep Learning"));
        assert_eq!(stored, &Node::from("Deep Learning"));
        assert_eq!(builder.occurrences("title"), 1);
    }

    #[test]
    fn test_second_occurrence_becomes_pair() {
        let mut builder = MappingBuilder::new();
        builder.coalesce_duplicate_key("x", Node::from(1));
        let stored = builder.coalesce_duplicate_key("x", Node::from(2)).clone();
        assert_eq!(stored, Node::Sequence(vec![Node::from(1), Node::from(2)]));
    }

    #[test]
    fn test_three_occurrences_are_flat_not_nested() {
        let mut builder = MappingBuilder::new();
        for v in [10, 20, 30] {
            builder.coalesce_duplicate_key("v", Node::from(v));
        }
        let entries = builder.into_entries();
        assert_eq!(
            entries["v"],
            Node::Sequence(vec![Node::from(10), Node::from(20), Node::from(30)])
        );
    }

    #[test]
    fn test_first_value_that_is_a_sequence_is_still_wrapped() {
        let mut builder = MappingBuilder::new();
        let first = Node::Sequence(vec![Node::from("a"), Node::from("b")]);
        builder.coalesce_duplicate_key("k", first.clone());
        builder.coalesce_duplicate_key("k", Node::from("c"));

        let entries = builder.into_entries();
        assert_eq!(
            entries["k"],
            Node::Sequence(vec![first, Node::from("c")])
        );
    }

    #[test]
    fn test_key_order_follows_first_occurrence() {
        let mut builder = MappingBuilder::new();
        builder.coalesce_duplicate_key("b", Node::from(1));
        builder.coalesce_duplicate_key("a", Node::from(2));
        builder.coalesce_duplicate_key("b", Node::from(3));

        let keys: Vec<_> = builder.into_entries().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
