//! Structural reports.
//!
//! `describe` walks a tree depth-first, pre-order, and yields one
//! `ReportLine` per visited node. Sequences are sampled: only the first
//! element is descended and the rest are summarised by a single line. A
//! container reached with no depth left yields one "max depth reached" line
//! in place of its subtree.
//!
//! The walk is lazy and uses an explicit stack, so callers can stop early and
//! deep trees do not recurse on the call stack.
//!
//! # Example
//!
//! ```
//! use treelens::document::parser::parse_json;
//! use treelens::introspect::describe;
//!
//! let doc = parse_json(r#"{"person": {"name": "Ana", "tags": ["x", "y", "z"]}}"#).unwrap();
//! let lines: Vec<String> = describe(doc.root(), 5)
//!     .unwrap()
//!     .map(|line| line.to_string())
//!     .collect();
//!
//! assert_eq!(
//!     lines,
//!     vec![
//!         "$: mapping (size=1)",
//!         "person: mapping (size=2)",
//!         "person.name: string = \"Ana\"",
//!         "person.tags: sequence (size=3)",
//!         "person.tags[0]: string = \"x\"",
//!         "person.tags[1..2]: ... (2 more elements)",
//!     ]
//! );
//! ```

use crate::document::node::{Node, NodeKind};
use crate::document::path::Path;
use crate::error::{IntrospectError, Result};
use std::fmt;

/// Default number of characters kept in a scalar preview.
pub const DEFAULT_PREVIEW_WIDTH: usize = 50;

/// Default depth limit, matching the command-line default.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Controls a `describe_with` walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeOptions {
    /// Container levels to descend before truncating
    pub max_depth: usize,
    /// Maximum characters in a scalar preview
    pub preview_width: usize,
    /// Descend only the first element of each sequence
    pub sample_sequences: bool,
}

impl Default for DescribeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            preview_width: DEFAULT_PREVIEW_WIDTH,
            sample_sequences: true,
        }
    }
}

impl DescribeOptions {
    /// Replaces the depth limit with a caller-supplied signed value.
    ///
    /// # Errors
    ///
    /// Returns `IntrospectError::InvalidArgument` if `max_depth` is negative.
    pub fn with_max_depth(self, max_depth: i64) -> Result<Self> {
        let max_depth = usize::try_from(max_depth).map_err(|_| {
            IntrospectError::InvalidArgument(format!(
                "max_depth must be non-negative, got {}",
                max_depth
            ))
        })?;
        Ok(Self { max_depth, ..self })
    }
}

/// What a report line says about its node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineDetail {
    /// A scalar and its truncated preview
    Scalar { preview: String },
    /// A mapping or sequence and its immediate child count
    Container { children: usize },
    /// Sequence elements after the first, summarised rather than visited
    MoreElements { remaining: usize },
    /// A container that was not descended
    MaxDepthReached,
}

/// One line of a structural report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub path: Path,
    pub kind: NodeKind,
    pub detail: LineDetail,
}

impl ReportLine {
    pub fn is_truncation(&self) -> bool {
        matches!(self.detail, LineDetail::MaxDepthReached)
    }

    pub fn is_summary(&self) -> bool {
        matches!(self.detail, LineDetail::MoreElements { .. })
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_root() {
            "$".to_string()
        } else {
            self.path.to_string()
        };

        match &self.detail {
            LineDetail::Scalar { preview } => write!(f, "{}: {} = {}", path, self.kind, preview),
            LineDetail::Container { children } => {
                write!(f, "{}: {} (size={})", path, self.kind, children)
            }
            LineDetail::MoreElements { remaining } => {
                // remaining elements occupy indices 1..=remaining
                let prefix = if self.path.is_root() { "" } else { path.as_str() };
                write!(
                    f,
                    "{}[1..{}]: ... ({} more elements)",
                    prefix, remaining, remaining
                )
            }
            LineDetail::MaxDepthReached => {
                write!(f, "{}: {} [max depth reached]", path, self.kind)
            }
        }
    }
}

/// Describes `node`, descending at most `max_depth` container levels.
///
/// Uses the default preview width and sequence sampling.
///
/// # Errors
///
/// Returns `IntrospectError::InvalidArgument` if `max_depth` is negative. The
/// check happens before any traversal.
pub fn describe(node: &Node, max_depth: i64) -> Result<Describe<'_>> {
    let options = DescribeOptions::default().with_max_depth(max_depth)?;
    Ok(describe_with(node, &options))
}

/// Describes `node` with explicit options.
pub fn describe_with<'a>(node: &'a Node, options: &DescribeOptions) -> Describe<'a> {
    Describe {
        stack: vec![Pending::Visit {
            node,
            path: Path::root(),
            remaining: options.max_depth,
        }],
        preview_width: options.preview_width,
        sample_sequences: options.sample_sequences,
    }
}

enum Pending<'a> {
    Visit {
        node: &'a Node,
        path: Path,
        remaining: usize,
    },
    Summary {
        path: Path,
        remaining: usize,
    },
}

/// Lazy iterator over the lines of a structural report.
pub struct Describe<'a> {
    stack: Vec<Pending<'a>>,
    preview_width: usize,
    sample_sequences: bool,
}

impl<'a> Describe<'a> {
    fn visit(&mut self, node: &'a Node, path: Path, remaining: usize) -> ReportLine {
        let kind = node.kind();

        if node.is_container() && remaining == 0 {
            return ReportLine {
                path,
                kind,
                detail: LineDetail::MaxDepthReached,
            };
        }

        match node {
            Node::Scalar(scalar) => ReportLine {
                path,
                kind,
                detail: LineDetail::Scalar {
                    preview: scalar.preview().chars().take(self.preview_width).collect(),
                },
            },
            Node::Mapping(entries) => {
                for (key, child) in entries.iter().rev() {
                    self.stack.push(Pending::Visit {
                        node: child,
                        path: path.key(key.as_str()),
                        remaining: remaining - 1,
                    });
                }
                ReportLine {
                    path,
                    kind,
                    detail: LineDetail::Container {
                        children: entries.len(),
                    },
                }
            }
            Node::Sequence(elements) => {
                if self.sample_sequences {
                    if elements.len() > 1 {
                        self.stack.push(Pending::Summary {
                            path: path.clone(),
                            remaining: elements.len() - 1,
                        });
                    }
                    if let Some(first) = elements.first() {
                        self.stack.push(Pending::Visit {
                            node: first,
                            path: path.index(0),
                            remaining: remaining - 1,
                        });
                    }
                } else {
                    for (i, child) in elements.iter().enumerate().rev() {
                        self.stack.push(Pending::Visit {
                            node: child,
                            path: path.index(i),
                            remaining: remaining - 1,
                        });
                    }
                }
                ReportLine {
                    path,
                    kind,
                    detail: LineDetail::Container {
                        children: elements.len(),
                    },
                }
            }
        }
    }
}

impl<'a> Iterator for Describe<'a> {
    type Item = ReportLine;

    fn next(&mut self) -> Option<ReportLine> {
        let line = match self.stack.pop()? {
            Pending::Visit {
                node,
                path,
                remaining,
            } => self.visit(node, path, remaining),
            Pending::Summary { path, remaining } => ReportLine {
                path,
                kind: NodeKind::Sequence,
                detail: LineDetail::MoreElements { remaining },
            },
        };
        Some(line)
    }
}
