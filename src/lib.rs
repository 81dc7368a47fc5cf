//! treelens: structural introspection of semi-structured documents.
//!
//! JSON, JSON Lines, YAML and XML documents are parsed into one tagged tree
//! type, [`document::node::Node`]. The [`introspect`] module then reports on
//! that tree: a depth-limited structural outline, a flattened path-to-scalar
//! map, record tables and whole-tree statistics.
//!
//! # Example
//!
//! ```
//! use treelens::document::xml::{parse_xml, XmlOptions};
//! use treelens::introspect::flatten;
//!
//! let xml = "<investigador><nombre>Ana</nombre><tema>NLP</tema><tema>ML</tema></investigador>";
//! let doc = parse_xml(xml, &XmlOptions::default()).unwrap();
//! let flat = flatten(doc.root());
//!
//! let keys: Vec<String> = flat.keys().map(|path| path.to_string()).collect();
//! assert_eq!(
//!     keys,
//!     vec!["investigador.nombre", "investigador.tema[0]", "investigador.tema[1]"]
//! );
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod file;
pub mod introspect;

pub use error::IntrospectError;
