//! Configuration system for treelens.
//!
//! This module provides the configuration structure with sensible defaults and
//! serde support. Configuration is loaded from a TOML file and command-line
//! flags override individual fields.
//!
//! # Example
//!
//! ```
//! use treelens::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.max_depth, 5);
//! assert_eq!(config.preview_width, 50);
//!
//! let custom = Config {
//!     max_depth: 2,
//!     ..Config::default()
//! };
//! assert!(custom.sample_sequences);
//! ```

use crate::document::xml::XmlOptions;
use crate::introspect::describe::{DescribeOptions, DEFAULT_MAX_DEPTH, DEFAULT_PREVIEW_WIDTH};
use serde::{Deserialize, Serialize};

/// Configuration for treelens.
///
/// # Fields
///
/// * `max_depth` - Container levels `describe` descends before truncating (default: 5)
/// * `preview_width` - Maximum characters in a scalar preview (default: 50)
/// * `sample_sequences` - Descend only the first element of each sequence (default: true)
/// * `xml_infer_types` - Turn numeric/boolean XML text into typed scalars (default: false)
/// * `log_level` - Log filter used when `RUST_LOG` is not set (default: "warn")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_preview_width")]
    pub preview_width: usize,

    #[serde(default = "default_sample_sequences")]
    pub sample_sequences: bool,

    #[serde(default)]
    pub xml_infer_types: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_preview_width() -> usize {
    DEFAULT_PREVIEW_WIDTH
}

fn default_sample_sequences() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            preview_width: default_preview_width(),
            sample_sequences: default_sample_sequences(),
            xml_infer_types: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/treelens/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("treelens");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    pub fn describe_options(&self) -> DescribeOptions {
        DescribeOptions {
            max_depth: self.max_depth,
            preview_width: self.preview_width,
            sample_sequences: self.sample_sequences,
        }
    }

    pub fn xml_options(&self) -> XmlOptions {
        XmlOptions {
            infer_types: self.xml_infer_types,
        }
    }
}
