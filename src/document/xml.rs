//! XML parsing into `Node` trees.
//!
//! XML has no native notion of mappings or lists, so the conversion follows
//! the usual "XML as dictionary" convention:
//!
//! - The root element becomes a one-entry mapping `{root_tag: content}`.
//! - Attributes are collected under `"@attributes"` as string scalars.
//! - An element holding only text becomes a string scalar.
//! - Text next to attributes or child elements goes under `"#text"`.
//! - An element with no attributes, no children and no text is an empty mapping.
//! - Repeated sibling tags are coalesced into a sequence.
//!
//! Text is trimmed; whitespace-only text counts as no text. Several text
//! segments of one element (text before and after a child, CDATA sections)
//! are joined with a single space. Comments, processing instructions and the
//! XML declaration are ignored.
//!
//! # Example
//!
//! ```
//! use treelens::document::xml::{parse_xml, XmlOptions};
//! use treelens::document::path::Path;
//! use treelens::document::node::Node;
//!
//! let xml = "<pubs><pub>A</pub><pub>B</pub></pubs>";
//! let doc = parse_xml(xml, &XmlOptions::default()).unwrap();
//! let pubs = doc.get(&Path::root().key("pubs").key("pub")).unwrap();
//! assert_eq!(pubs, &Node::Sequence(vec![Node::from("A"), Node::from("B")]));
//! ```

use super::builder::MappingBuilder;
use super::node::{Node, Scalar};
use super::tree::{Document, SourceFormat};
use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::trace;

/// Key under which element attributes are stored.
pub const ATTRIBUTES_KEY: &str = "@attributes";
/// Key under which element text is stored when the element also has
/// attributes or children.
pub const TEXT_KEY: &str = "#text";

/// Options for XML conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlOptions {
    /// Convert text that looks like a boolean, integer or float into that
    /// scalar kind instead of keeping every value a string.
    pub infer_types: bool,
}

/// An element whose end tag has not been reached yet.
struct OpenElement {
    name: String,
    attributes: IndexMap<String, Node>,
    text: Vec<String>,
    children: MappingBuilder,
}

impl OpenElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let mut attributes = IndexMap::new();
        for attr in start.attributes() {
            let attr = attr.with_context(|| format!("Malformed attribute on <{}>", name))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .with_context(|| format!("Malformed value for attribute '{}' on <{}>", key, name))?;
            attributes.insert(key, Node::Scalar(Scalar::String(value.into_owned())));
        }

        Ok(Self {
            name,
            attributes,
            text: Vec::new(),
            children: MappingBuilder::new(),
        })
    }

    fn push_text(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            self.text.push(trimmed.to_string());
        }
    }

    fn finish(self, options: &XmlOptions) -> (String, Node) {
        let text = if self.text.is_empty() {
            None
        } else {
            Some(self.text.join(" "))
        };

        if self.attributes.is_empty() && self.children.is_empty() {
            let node = match text {
                Some(text) => Node::Scalar(text_scalar(text, options)),
                None => Node::empty_mapping(),
            };
            return (self.name, node);
        }

        let mut entries = IndexMap::new();
        if !self.attributes.is_empty() {
            entries.insert(ATTRIBUTES_KEY.to_string(), Node::Mapping(self.attributes));
        }
        if let Some(text) = text {
            entries.insert(TEXT_KEY.to_string(), Node::Scalar(text_scalar(text, options)));
        }
        entries.extend(self.children.into_entries());

        (self.name, Node::Mapping(entries))
    }
}

/// Parses an XML string into a `Document`.
///
/// # Errors
///
/// Returns an error if the XML is malformed (mismatched or unclosed tags,
/// bad attributes, invalid escapes), has no root element, or has more than
/// one root element.
pub fn parse_xml(xml_str: &str, options: &XmlOptions) -> Result<Document> {
    let mut reader = Reader::from_str(xml_str);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<(String, Node)> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => bail!(
                "Failed to parse XML at byte {}: {}",
                reader.buffer_position(),
                e
            ),
        };

        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    bail!("XML document has more than one root element");
                }
                stack.push(OpenElement::from_start(&start)?);
            }
            Event::Empty(start) => {
                if stack.is_empty() && root.is_some() {
                    bail!("XML document has more than one root element");
                }
                let element = OpenElement::from_start(&start)?;
                close_element(element, &mut stack, &mut root, options);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| anyhow!("Unexpected closing tag in XML"))?;
                close_element(element, &mut stack, &mut root, options);
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    let unescaped = text.unescape().context("Invalid escape in XML text")?;
                    current.push_text(&unescaped);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        bail!("XML ended before <{}> was closed", open.name);
    }
    let (name, node) = root.ok_or_else(|| anyhow!("XML document has no root element"))?;

    let mut entries = IndexMap::new();
    entries.insert(name, node);
    Ok(Document::new(Node::Mapping(entries), SourceFormat::Xml))
}

fn close_element(
    element: OpenElement,
    stack: &mut [OpenElement],
    root: &mut Option<(String, Node)>,
    options: &XmlOptions,
) {
    let (name, node) = element.finish(options);
    match stack.last_mut() {
        Some(parent) => {
            let occurrences = parent.children.occurrences(&name) + 1;
            if occurrences > 1 {
                trace!(tag = %name, occurrences, "coalescing repeated XML tag");
            }
            parent.children.coalesce_duplicate_key(name, node);
        }
        None => *root = Some((name, node)),
    }
}

fn text_scalar(text: String, options: &XmlOptions) -> Scalar {
    if options.infer_types {
        infer_scalar(text)
    } else {
        Scalar::String(text)
    }
}

/// Interprets element text as the narrowest scalar it spells.
///
/// Only plain decimal notation is treated as numeric, so words such as `inf`
/// or `NaN` stay strings.
pub fn infer_scalar(text: String) -> Scalar {
    match text.as_str() {
        "true" => return Scalar::Boolean(true),
        "false" => return Scalar::Boolean(false),
        _ => {}
    }
    if let Ok(i) = text.parse::<i64>() {
        return Scalar::Integer(i);
    }
    let numeric = text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'));
    if numeric {
        if let Ok(f) = text.parse::<f64>() {
            return Scalar::Float(f);
        }
    }
    Scalar::String(text)
}
