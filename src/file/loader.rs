//! Document loading from files and stdin.
//!
//! This module reads JSON, JSON Lines, YAML and XML documents, optionally
//! gzip-compressed, and parses them into `Document` trees. The format is
//! chosen from the file name; stdin content is sniffed.

use crate::config::Config;
use crate::document::node::Node;
use crate::document::parser::{node_from_json, parse_json, parse_yaml};
use crate::document::tree::{Document, SourceFormat};
use crate::document::xml::parse_xml;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loads and parses a document from the filesystem.
///
/// The format is determined by [`detect_format`]; files ending in `.gz` are
/// decompressed first.
///
/// # Examples
///
/// ```no_run
/// use treelens::config::Config;
/// use treelens::file::loader::load_file;
///
/// let doc = load_file("dataset_investigacion.xml", &Config::default()).unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file does not exist or cannot be read
/// - The extension is not a supported format
/// - The file is gzipped but corrupted
/// - The contents do not parse in the detected format
pub fn load_file<P: AsRef<Path>>(path: P, config: &Config) -> Result<Document> {
    let path_ref = path.as_ref();

    let format = detect_format(path_ref).with_context(|| {
        format!(
            "Unsupported file type '{}': expected .json, .jsonl, .ndjson, .yaml, .yml or .xml (optionally .gz)",
            path_ref.display()
        )
    })?;

    let content = if is_gzipped(path_ref) {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read file '{}'", path_ref.display()))?
    };

    debug!(path = %path_ref.display(), %format, bytes = content.len(), "loaded file");
    parse_content(&content, format, config)
}

/// Parses `content` in the given format.
pub fn parse_content(content: &str, format: SourceFormat, config: &Config) -> Result<Document> {
    match format {
        SourceFormat::Json => parse_json(content),
        SourceFormat::JsonLines => parse_jsonl_content(content),
        SourceFormat::Yaml => parse_yaml(content),
        SourceFormat::Xml => parse_xml(content, &config.xml_options()),
    }
}

/// Parses JSONL content (newline-delimited JSON).
///
/// Each line must be a valid JSON value. Blank lines are skipped. The root of
/// the resulting document is a sequence with one element per line.
pub fn parse_jsonl_content(content: &str) -> Result<Document> {
    let mut lines = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let value: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("Invalid JSON on line {}", line_num + 1))?;

        lines.push(node_from_json(&value));
    }

    if lines.is_empty() {
        anyhow::bail!("No valid JSON found in JSONL content");
    }

    Ok(Document::new(Node::Sequence(lines), SourceFormat::JsonLines))
}

/// Loads and parses a document from standard input.
///
/// Gzip input is recognised by its magic bytes. Content starting with `<` is
/// parsed as XML; anything else is tried as JSON, then JSON Lines, then YAML.
pub fn load_stdin(config: &Config) -> Result<Document> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    load_bytes(&buffer, config)
}

/// Sniffs and parses raw bytes, as read from stdin.
pub fn load_bytes(bytes: &[u8], config: &Config) -> Result<Document> {
    // Check for gzip magic bytes (0x1f 0x8b)
    let content = if bytes.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(bytes)?
    } else {
        String::from_utf8(bytes.to_vec()).context("Invalid UTF-8 in input")?
    };

    if content.trim_start().starts_with('<') {
        debug!("input looks like XML");
        return parse_xml(&content, &config.xml_options());
    }

    if let Ok(doc) = parse_json(&content) {
        return Ok(doc);
    }
    if let Ok(doc) = parse_jsonl_content(&content) {
        debug!("input parsed as JSON Lines");
        return Ok(doc);
    }

    parse_yaml(&content)
        .context("Failed to parse input: it is neither valid JSON, JSON Lines, YAML nor XML")
}

/// Determines the document format from a file name.
///
/// A trailing `.gz` is ignored. Examples:
/// - `data.jsonl` → JSON Lines
/// - `data.json.gz` → JSON
/// - `ontologia.xml` → XML
/// - `data.csv` → `None`
pub fn detect_format<P: AsRef<Path>>(path: P) -> Option<SourceFormat> {
    let path_str = path.as_ref().to_string_lossy().to_lowercase();
    let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);

    let extension = base.rsplit_once('.').map(|(_, ext)| ext)?;
    match extension {
        "json" => Some(SourceFormat::Json),
        "jsonl" | "ndjson" => Some(SourceFormat::JsonLines),
        "yaml" | "yml" => Some(SourceFormat::Yaml),
        "xml" => Some(SourceFormat::Xml),
        _ => None,
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Reads and decompresses a gzipped file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The file is not valid gzip format (corrupted)
/// - The decompressed content is not valid UTF-8
fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped input")?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jsonl_content_simple() {
        let content = r#"{"id":1,"name":"Alice"}
{"id":2,"name":"Bob"}
{"id":3,"name":"Charlie"}"#;

        let doc = parse_jsonl_content(content).unwrap();
        assert_eq!(doc.format(), SourceFormat::JsonLines);

        let lines = doc.root().as_sequence().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].as_mapping().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_jsonl_content_skips_blank_lines() {
        let content = "{\"id\":1}\n\n{\"id\":2}\n\n{\"id\":3}";
        let doc = parse_jsonl_content(content).unwrap();
        assert_eq!(doc.root().child_count(), 3);
    }

    #[test]
    fn test_parse_jsonl_content_empty() {
        let result = parse_jsonl_content("");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("No valid JSON found"));
    }

    #[test]
    fn test_parse_jsonl_content_invalid_json_line() {
        let content = "{\"valid\":true}\n{invalid json}\n{\"valid\":false}";
        let err = parse_jsonl_content(content).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON on line 2"));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format("data.jsonl"), Some(SourceFormat::JsonLines));
        assert_eq!(detect_format("data.ndjson.gz"), Some(SourceFormat::JsonLines));
        assert_eq!(detect_format("path/to/data.json.gz"), Some(SourceFormat::Json));
        assert_eq!(detect_format("config.YML"), Some(SourceFormat::Yaml));
        assert_eq!(detect_format("ontologia_medica.xml"), Some(SourceFormat::Xml));
        assert_eq!(detect_format("datos.csv"), None);
        assert_eq!(detect_format("README"), None);
    }

    #[test]
    fn test_load_bytes_sniffs_formats() {
        let config = Config::default();
        assert_eq!(
            load_bytes(b"{\"a\": 1}", &config).unwrap().format(),
            SourceFormat::Json
        );
        assert_eq!(
            load_bytes(b"{\"a\": 1}\n{\"a\": 2}\n", &config).unwrap().format(),
            SourceFormat::JsonLines
        );
        assert_eq!(
            load_bytes(b"a: 1\nb: [x]\n", &config).unwrap().format(),
            SourceFormat::Yaml
        );
        assert_eq!(
            load_bytes(b"  <r><a>1</a></r>", &config).unwrap().format(),
            SourceFormat::Xml
        );
    }

    #[test]
    fn test_load_bytes_gzip() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"{"test": "value"}"#).unwrap();
        let compressed = encoder.finish().unwrap();

        let doc = load_bytes(&compressed, &Config::default()).unwrap();
        assert_eq!(doc.format(), SourceFormat::Json);
    }

    #[test]
    fn test_read_gzipped_file_corrupted() {
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        let gz_path = dir.path().join("broken.json.gz");
        fs::write(&gz_path, b"not gzip data").unwrap();

        let err_msg = read_gzipped_file(&gz_path).unwrap_err().to_string();
        assert!(err_msg.contains("decompress") || err_msg.contains("corrupted"));
    }
}
