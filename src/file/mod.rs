//! File I/O for documents.
//!
//! This module loads JSON, JSON Lines, YAML and XML documents from disk or
//! stdin, with transparent gzip decompression.

pub mod loader;
