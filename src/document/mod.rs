//! Document model and parsers.
//!
//! - `node`: the `Node` tree every format is converted into
//! - `path`: paths addressing nodes, and their rendered form
//! - `builder`: mapping construction with duplicate-key coalescing
//! - `tree`: parsed documents and path lookup
//! - `parser`: JSON and YAML conversion
//! - `xml`: XML conversion

pub mod builder;
pub mod node;
pub mod parser;
pub mod path;
pub mod tree;
pub mod xml;
