//! Error types for tree introspection.

use thiserror::Error;

/// Errors raised by the introspection core.
///
/// Malformed source documents are not represented here; loaders report those
/// through `anyhow` with context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntrospectError {
    /// A parser value could not be represented as a `Node`.
    #[error("Invalid node at '{path}': {reason}")]
    InvalidNode { path: String, reason: String },

    /// A caller-supplied argument violated a precondition.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, IntrospectError>;
