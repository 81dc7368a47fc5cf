//! Flattening trees into single-level maps and tables.
//!
//! `flatten` keeps every scalar leaf and discards the grouping structure:
//! each leaf is keyed by its `Path` from the root. Interior mappings and
//! sequences contribute no entries of their own, so empty containers
//! disappear from the result. Keys stay structured, so a top-level key such
//! as `"a.b"` is a one-segment path and never meets the nested `a` → `b`.
//! Paths render as `person.tags[0]` for display and export.
//!
//! `flatten_records` applies the same transformation to each element of a
//! sequence and lines the results up as table rows, the shape a JSON Lines
//! file takes when loaded into a dataframe.

use crate::document::node::{Node, Scalar};
use crate::document::path::Path;
use anyhow::{bail, Context, Result};
use indexmap::{IndexMap, IndexSet};
use std::io::Write;

/// Scalar leaves keyed by path, in document order.
pub type FlatMap = IndexMap<Path, Scalar>;

/// Flattens `node` into a map from path to scalar.
///
/// A scalar root yields one entry under the root path.
///
/// # Example
///
/// ```
/// use treelens::document::parser::parse_json;
/// use treelens::document::node::Scalar;
/// use treelens::document::path::Path;
/// use treelens::introspect::flatten;
///
/// let doc = parse_json(r#"{"a": {"b": 1, "c": 2}}"#).unwrap();
/// let flat = flatten(doc.root());
/// assert_eq!(flat[&Path::parse("a.b").unwrap()], Scalar::Integer(1));
///
/// let rendered: Vec<String> = flat.keys().map(|path| path.to_string()).collect();
/// assert_eq!(rendered, vec!["a.b", "a.c"]);
/// ```
pub fn flatten(node: &Node) -> FlatMap {
    let mut flat = FlatMap::new();
    let mut stack = vec![(node, Path::root())];

    while let Some((current, path)) = stack.pop() {
        match current {
            Node::Scalar(scalar) => {
                flat.insert(path, scalar.clone());
            }
            Node::Mapping(entries) => {
                for (key, child) in entries.iter().rev() {
                    stack.push((child, path.key(key.as_str())));
                }
            }
            Node::Sequence(elements) => {
                for (i, child) in elements.iter().enumerate().rev() {
                    stack.push((child, path.index(i)));
                }
            }
        }
    }

    flat
}

/// Flattened records with a unified column set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column paths in first-seen order
    pub columns: Vec<Path>,
    /// One row per record; `None` where a record lacks a column
    pub rows: Vec<Vec<Option<Scalar>>>,
}

impl Table {
    /// Writes the table as delimiter-separated text with a header row.
    ///
    /// Missing cells are written empty. Cells holding the delimiter, quotes or
    /// line breaks are quoted, so the output reads back unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if `delimiter` is not a single ASCII character or the
    /// writer fails.
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: char) -> Result<()> {
        if !delimiter.is_ascii() {
            bail!("Delimiter must be an ASCII character, got '{}'", delimiter);
        }

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(delimiter as u8)
            .from_writer(writer);

        csv_writer
            .write_record(self.columns.iter().map(|column| column.to_string()))
            .context("Failed to write table header")?;

        for (index, row) in self.rows.iter().enumerate() {
            let cells = row
                .iter()
                .map(|cell| cell.as_ref().map(Scalar::to_string).unwrap_or_default());
            csv_writer
                .write_record(cells)
                .with_context(|| format!("Failed to write table row {}", index + 1))?;
        }

        csv_writer.flush().context("Failed to flush table output")?;
        Ok(())
    }
}

/// Flattens each element of a sequence into a table row.
///
/// A non-sequence root is treated as a single record.
///
/// # Example
///
/// ```
/// use treelens::document::parser::parse_json;
/// use treelens::introspect::flatten_records;
///
/// let doc = parse_json(r#"[{"id": 1, "t": 20.5}, {"id": 2, "h": 40}]"#).unwrap();
/// let table = flatten_records(doc.root());
/// let columns: Vec<String> = table.columns.iter().map(|c| c.to_string()).collect();
/// assert_eq!(columns, vec!["id", "t", "h"]);
/// assert!(table.rows[1][1].is_none());
/// ```
pub fn flatten_records(node: &Node) -> Table {
    let records: Vec<FlatMap> = match node {
        Node::Sequence(elements) => elements.iter().map(flatten).collect(),
        other => vec![flatten(other)],
    };

    let mut columns = IndexSet::new();
    for record in &records {
        for key in record.keys() {
            columns.insert(key.clone());
        }
    }

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| record.get(column).cloned())
                .collect()
        })
        .collect();

    Table {
        columns: columns.into_iter().collect(),
        rows,
    }
}
