//! Structural introspection of `Node` trees.
//!
//! Every routine here is read-only and keeps no state between calls.
//!
//! - `describe`: lazy, depth-limited structural report
//! - `flatten`: scalar leaves keyed by rendered path, and record tables
//! - `stats`: node counts and depth
//! - `validate`: JSON Schema validation with violations located by path

pub mod describe;
pub mod flatten;
pub mod stats;
pub mod validate;

pub use describe::{describe, describe_with, Describe, DescribeOptions, LineDetail, ReportLine};
pub use flatten::{flatten, flatten_records, FlatMap, Table};
pub use stats::{depth, leaf_count, stats, TreeStats};
pub use validate::{validate, SchemaViolation};
