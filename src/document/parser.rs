//! JSON and YAML parsing into `Node` trees.
//!
//! Both formats are parsed by their serde crates first; the resulting dynamic
//! values are then converted into `Node`. JSON objects keep their source key
//! order (`serde_json` is built with `preserve_order`).
//!
//! # Example
//!
//! ```
//! use treelens::document::parser::parse_json;
//! use treelens::document::node::Node;
//!
//! let doc = parse_json(r#"{"name": "Ana", "age": 31}"#).unwrap();
//! let root = doc.root().as_mapping().unwrap();
//! assert_eq!(root["age"], Node::from(31));
//! ```

use super::node::{Node, Scalar};
use super::path::Path;
use super::tree::{Document, SourceFormat};
use crate::error::IntrospectError;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

/// Parses a JSON string into a `Document`.
///
/// # Errors
///
/// Returns an error if the input is not valid JSON.
///
/// ```
/// use treelens::document::parser::parse_json;
///
/// assert!(parse_json(r#"{"unclosed": "#).is_err());
/// ```
pub fn parse_json(json_str: &str) -> Result<Document> {
    let value: JsonValue = serde_json::from_str(json_str).context("Failed to parse JSON")?;
    Ok(Document::new(node_from_json(&value), SourceFormat::Json))
}

/// Converts a `serde_json::Value` into a `Node`.
///
/// Integers that fit in `i64` stay integers; larger ones become floats.
pub fn node_from_json(value: &JsonValue) -> Node {
    match value {
        JsonValue::Object(map) => Node::Mapping(
            map.iter()
                .map(|(k, v)| (k.clone(), node_from_json(v)))
                .collect(),
        ),
        JsonValue::Array(arr) => Node::Sequence(arr.iter().map(node_from_json).collect()),
        JsonValue::String(s) => Node::Scalar(Scalar::String(s.clone())),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Node::Scalar(Scalar::Integer(i)),
            None => Node::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
        },
        JsonValue::Bool(b) => Node::Scalar(Scalar::Boolean(*b)),
        JsonValue::Null => Node::Scalar(Scalar::Null),
    }
}

/// Parses a YAML string into a `Document`.
///
/// A stream with several `---` separated documents becomes a sequence with
/// one element per document. An empty stream is a null scalar.
///
/// # Errors
///
/// Returns an error if the input is not valid YAML, or if a mapping uses a
/// key that cannot be rendered as a string (a sequence or mapping key).
pub fn parse_yaml(yaml_str: &str) -> Result<Document> {
    let mut documents = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(yaml_str).enumerate() {
        let value = YamlValue::deserialize(document)
            .with_context(|| format!("Failed to parse YAML document {}", index + 1))?;
        documents.push(
            node_from_yaml(&value)
                .with_context(|| format!("Unsupported YAML in document {}", index + 1))?,
        );
    }

    let root = match documents.len() {
        0 => Node::Scalar(Scalar::Null),
        1 => documents.remove(0),
        _ => Node::Sequence(documents),
    };

    Ok(Document::new(root, SourceFormat::Yaml))
}

/// Converts a `serde_yaml::Value` into a `Node`.
///
/// Scalar keys are stringified; tagged values are unwrapped to their inner
/// value.
///
/// # Errors
///
/// Returns `IntrospectError::InvalidNode` for sequence or mapping keys and for
/// keys that collide once stringified (`1` and `"1"`).
pub fn node_from_yaml(value: &YamlValue) -> Result<Node, IntrospectError> {
    convert_yaml(value, &Path::root())
}

fn convert_yaml(value: &YamlValue, path: &Path) -> Result<Node, IntrospectError> {
    let node = match value {
        YamlValue::Mapping(mapping) => {
            let mut entries = IndexMap::with_capacity(mapping.len());
            for (k, v) in mapping {
                let key = yaml_key(k, path)?;
                let child = convert_yaml(v, &path.key(key.as_str()))?;
                if entries.insert(key.clone(), child).is_some() {
                    return Err(IntrospectError::InvalidNode {
                        path: path.to_string(),
                        reason: format!("duplicate key '{}' after stringification", key),
                    });
                }
            }
            Node::Mapping(entries)
        }
        YamlValue::Sequence(seq) => Node::Sequence(
            seq.iter()
                .enumerate()
                .map(|(i, v)| convert_yaml(v, &path.index(i)))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        YamlValue::String(s) => Node::Scalar(Scalar::String(s.clone())),
        YamlValue::Number(n) => match n.as_i64() {
            Some(i) => Node::Scalar(Scalar::Integer(i)),
            None => Node::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
        },
        YamlValue::Bool(b) => Node::Scalar(Scalar::Boolean(*b)),
        YamlValue::Null => Node::Scalar(Scalar::Null),
        YamlValue::Tagged(tagged) => convert_yaml(&tagged.value, path)?,
    };
    Ok(node)
}

fn yaml_key(key: &YamlValue, path: &Path) -> Result<String, IntrospectError> {
    match key {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Tagged(tagged) => yaml_key(&tagged.value, path),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => Err(IntrospectError::InvalidNode {
            path: path.to_string(),
            reason: "mapping keys must be scalars".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::NodeKind;

    #[test]
    fn test_parse_json_scalars() {
        assert_eq!(parse_json("\"hello\"").unwrap().into_root(), Node::from("hello"));
        assert_eq!(parse_json("42").unwrap().into_root(), Node::from(42));
        assert_eq!(parse_json("42.5").unwrap().into_root(), Node::from(42.5));
        assert_eq!(parse_json("true").unwrap().into_root(), Node::from(true));
        assert_eq!(
            parse_json("null").unwrap().into_root(),
            Node::Scalar(Scalar::Null)
        );
    }

    #[test]
    fn test_parse_json_large_integer_becomes_float() {
        let root = parse_json("18446744073709551615").unwrap().into_root();
        assert_eq!(root.kind(), NodeKind::Float);
    }

    #[test]
    fn test_parse_json_preserves_key_order() {
        let doc = parse_json(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let keys: Vec<_> = doc.root().as_mapping().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_json_invalid() {
        let err = parse_json("{invalid}").unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }

    #[test]
    fn test_parse_yaml_nested() {
        let yaml = "person:\n  name: Ana\n  tags: [x, y]\n";
        let doc = parse_yaml(yaml).unwrap();
        let person = &doc.root().as_mapping().unwrap()["person"];
        let tags = person.as_mapping().unwrap()["tags"].as_sequence().unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(doc.format(), SourceFormat::Yaml);
    }

    #[test]
    fn test_parse_yaml_scalar_keys_are_stringified() {
        let doc = parse_yaml("1: one\ntrue: yes\n").unwrap();
        let keys: Vec<_> = doc.root().as_mapping().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["1", "true"]);
    }

    #[test]
    fn test_parse_yaml_complex_key_is_invalid_node() {
        let yaml = "outer:\n  ? [a, b]\n  : value\n";
        let value: YamlValue = serde_yaml::from_str(yaml).unwrap();
        let err = node_from_yaml(&value).unwrap_err();
        assert_eq!(
            err,
            IntrospectError::InvalidNode {
                path: "outer".to_string(),
                reason: "mapping keys must be scalars".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_yaml_tagged_value_is_unwrapped() {
        let doc = parse_yaml("value: !custom 5\n").unwrap();
        assert_eq!(doc.root().as_mapping().unwrap()["value"], Node::from(5));
    }

    #[test]
    fn test_parse_yaml_multi_document() {
        let doc = parse_yaml("a: 1\n---\nb: 2\n").unwrap();
        assert_eq!(doc.root().as_sequence().unwrap().len(), 2);
    }
}
