//! JSON Schema validation of `Node` trees.
//!
//! Both the document and the schema are ordinary trees, so a schema may be
//! written in any format the loaders read. Every violation is reported, not
//! only the first, with its location in the document and the schema keyword
//! that rejected it, both as `Path`s.
//!
//! # Example
//!
//! ```
//! use treelens::document::parser::{parse_json, parse_yaml};
//! use treelens::introspect::validate;
//!
//! let schema = parse_yaml("type: object\nproperties:\n  accuracy: {maximum: 1}\n").unwrap();
//! let doc = parse_json(r#"{"accuracy": 1.5}"#).unwrap();
//!
//! let violations = validate(doc.root(), schema.root()).unwrap();
//! assert_eq!(violations.len(), 1);
//! assert_eq!(violations[0].instance_path.to_string(), "accuracy");
//! assert_eq!(violations[0].schema_path.to_string(), "properties.accuracy.maximum");
//! ```

use crate::document::node::Node;
use crate::document::path::Path;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// One way in which a document fails its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// Location of the offending value in the document
    pub instance_path: Path,
    /// Location of the failing keyword in the schema
    pub schema_path: Path,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instance = if self.instance_path.is_root() {
            "$".to_string()
        } else {
            self.instance_path.to_string()
        };
        write!(
            f,
            "{}: {} (schema: {})",
            instance, self.message, self.schema_path
        )
    }
}

/// Validates `document` against the JSON Schema `schema`.
///
/// Returns every violation found; an empty vector means the document is
/// valid.
///
/// # Errors
///
/// Returns an error if `schema` is not a valid JSON Schema.
pub fn validate(document: &Node, schema: &Node) -> Result<Vec<SchemaViolation>> {
    let schema_value = serde_json::to_value(schema).context("Failed to convert schema to JSON")?;
    let instance = serde_json::to_value(document).context("Failed to convert document to JSON")?;

    let validator =
        jsonschema::validator_for(&schema_value).map_err(|e| anyhow!("Invalid JSON Schema: {}", e))?;

    let violations: Vec<SchemaViolation> = validator
        .iter_errors(&instance)
        .map(|error| SchemaViolation {
            instance_path: path_from_pointer(&error.instance_path.to_string(), document),
            schema_path: path_from_pointer(&error.schema_path.to_string(), schema),
            message: error.to_string(),
        })
        .collect();

    debug!(violations = violations.len(), "validated document against schema");
    Ok(violations)
}

/// Converts a JSON Pointer into a `Path`, walking `root` to tell sequence
/// indices from numeric mapping keys. Tokens past the end of the tree are
/// taken as keys.
fn path_from_pointer(pointer: &str, root: &Node) -> Path {
    let mut path = Path::root();
    let mut current = Some(root);

    for raw in pointer.split('/').skip(1) {
        let token = raw.replace("~1", "/").replace("~0", "~");
        match (current, token.parse::<usize>()) {
            (Some(Node::Sequence(elements)), Ok(index)) => {
                current = elements.get(index);
                path = path.index(index);
            }
            (Some(Node::Mapping(entries)), _) => {
                current = entries.get(token.as_str());
                path = path.key(token);
            }
            _ => {
                current = None;
                path = path.key(token);
            }
        }
    }

    path
}
