//! Paths locating a node from the tree root.
//!
//! A `Path` renders as dot-separated keys with bracketed sequence indices:
//! `person.tags[0]`. Keys that would make the rendering ambiguous (empty, or
//! containing `.`, `[`, `]` or `"`) render in quoted bracket form instead:
//! `["a.b"]`. The root path renders as the empty string.
//!
//! # Example
//!
//! ```
//! use treelens::document::path::Path;
//!
//! let path = Path::root().key("person").key("tags").index(2);
//! assert_eq!(path.to_string(), "person.tags[2]");
//! assert_eq!(Path::parse("person.tags[2]").unwrap(), path);
//! ```

use crate::error::{IntrospectError, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// A single step from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Mapping key
    Key(String),
    /// Zero-based sequence index
    Index(usize),
}

/// The ordered segments from the root to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The empty path, addressing the root itself.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Returns a new path extended by a mapping key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    /// Returns a new path extended by a sequence index.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Parses the rendered form back into a path.
    ///
    /// The empty string parses to the root path. Bare keys may contain any
    /// character except `.`, `[`, `]` and `"`; other keys must use the quoted
    /// bracket form with `\"` and `\\` escapes.
    ///
    /// # Errors
    ///
    /// Returns `IntrospectError::InvalidArgument` for malformed input such as
    /// `a..b`, `a[x]` or an unterminated bracket.
    pub fn parse(input: &str) -> Result<Self> {
        PathParser::new(input).parse()
    }
}

/// Keys that would collide with path syntax are rendered quoted.
fn needs_quoting(key: &str) -> bool {
    key.is_empty() || key.contains(['.', '[', ']', '"'])
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if needs_quoting(key) => {
                    f.write_str("[\"")?;
                    for ch in key.chars() {
                        if ch == '"' || ch == '\\' {
                            f.write_str("\\")?;
                        }
                        write!(f, "{}", ch)?;
                    }
                    f.write_str("\"]")?;
                }
                PathSegment::Key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Serializes as the rendered form, so path-keyed maps export as JSON objects.
impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct PathParser {
    chars: Vec<char>,
    position: usize,
}

impl PathParser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    fn parse(mut self) -> Result<Path> {
        let mut segments = Vec::new();

        while let Some(ch) = self.peek() {
            match ch {
                '[' => {
                    self.next();
                    segments.push(self.parse_bracket()?);
                }
                '.' if self.position > 0 => {
                    self.next();
                    segments.push(PathSegment::Key(self.parse_bare_key()?));
                }
                '.' => return Err(self.error("path cannot start with '.'")),
                _ if self.position == 0 => {
                    segments.push(PathSegment::Key(self.parse_bare_key()?));
                }
                other => {
                    return Err(self.error(&format!("unexpected '{}'", other)));
                }
            }
        }

        Ok(Path::new(segments))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.next() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(self.error(&format!("expected '{}', found '{}'", expected, ch))),
            None => Err(self.error(&format!("expected '{}', found end of input", expected))),
        }
    }

    fn parse_bare_key(&mut self) -> Result<String> {
        let mut key = String::new();
        while let Some(ch) = self.peek() {
            if matches!(ch, '.' | '[' | ']' | '"') {
                break;
            }
            key.push(ch);
            self.next();
        }
        if key.is_empty() {
            return Err(self.error("empty key"));
        }
        Ok(key)
    }

    /// Parses the inside of `[...]`; the opening bracket is already consumed.
    fn parse_bracket(&mut self) -> Result<PathSegment> {
        if self.peek() == Some('"') {
            self.next();
            let mut key = String::new();
            loop {
                match self.next() {
                    Some('\\') => match self.next() {
                        Some(escaped) => key.push(escaped),
                        None => return Err(self.error("unterminated escape")),
                    },
                    Some('"') => break,
                    Some(ch) => key.push(ch),
                    None => return Err(self.error("unterminated quoted key")),
                }
            }
            self.expect(']')?;
            return Ok(PathSegment::Key(key));
        }

        let mut digits = String::new();
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            digits.push(ch);
            self.next();
        }
        self.expect(']')?;
        digits
            .parse::<usize>()
            .map(PathSegment::Index)
            .map_err(|_| self.error("index must be a non-negative integer"))
    }

    fn error(&self, message: &str) -> IntrospectError {
        IntrospectError::InvalidArgument(format!(
            "malformed path at position {}: {}",
            self.position, message
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_root_is_empty() {
        assert_eq!(Path::root().to_string(), "");
    }

    #[test]
    fn test_render_keys_and_indices() {
        let path = Path::root().key("a").index(0).key("b");
        assert_eq!(path.to_string(), "a[0].b");

        let top_index = Path::root().index(3);
        assert_eq!(top_index.to_string(), "[3]");
    }

    #[test]
    fn test_render_quotes_ambiguous_keys() {
        assert_eq!(Path::root().key("a.b").to_string(), r#"["a.b"]"#);
        assert_eq!(Path::root().key("x").key("").to_string(), r#"x[""]"#);
        assert_eq!(
            Path::root().key(r#"say "hi""#).to_string(),
            r#"["say \"hi\""]"#
        );
    }

    #[test]
    fn test_parse_round_trip_of_awkward_keys() {
        let path = Path::root()
            .key("weird.key")
            .index(12)
            .key(r#"q"uote\"#)
            .key("plain");
        assert_eq!(Path::parse(&path.to_string()).unwrap(), path);
    }

    #[test]
    fn test_serialize_as_rendered_string() {
        let path = Path::root().key("a.b").index(1);
        assert_eq!(serde_json::to_string(&path).unwrap(), r#""[\"a.b\"][1]""#);
    }

    #[test]
    fn test_parse_empty_is_root() {
        assert!(Path::parse("").unwrap().is_root());
    }

    #[test]
    fn test_parse_non_ascii_keys() {
        let path = Path::parse("investigador.año").unwrap();
        assert_eq!(path, Path::root().key("investigador").key("año"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Path::parse(".a").is_err());
        assert!(Path::parse("a..b").is_err());
        assert!(Path::parse("a[x]").is_err());
        assert!(Path::parse("a[1").is_err());
        assert!(Path::parse(r#"a["open"#).is_err());
        assert!(Path::parse("a[0]b").is_err());
        assert!(matches!(
            Path::parse("a[-1]"),
            Err(IntrospectError::InvalidArgument(_))
        ));
    }
}
