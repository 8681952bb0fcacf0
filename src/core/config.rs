//! Site configuration
//!
//! Read from an optional `yamlsite.json` at the root. Every field has a
//! default, so a missing file and `{}` configure the same site.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::file_reader::{FileReadConfig, DEFAULT_MAX_FILE_SIZE};
use crate::core::util::HashAlgorithm;
use crate::markup::ParseOptions;

/// Configuration file name looked up under the root
pub const CONFIG_FILE: &str = "yamlsite.json";

/// Site layout and rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding page templates
    pub templates_dir: PathBuf,

    /// Directory copied verbatim to `<out>/static/`
    pub static_dir: PathBuf,

    pub out_dir: PathBuf,

    /// Template file extensions
    pub extensions: Vec<String>,

    /// Default page title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Stylesheet embedded as the page style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<PathBuf>,

    pub max_depth: usize,

    /// Node budget per template, alias copies included
    pub max_nodes: usize,

    pub keep_anchor_declarations: bool,

    pub max_file_size: u64,

    /// Content hash for check results and the build manifest
    pub hash: HashAlgorithm,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let parse = ParseOptions::default();
        Self {
            templates_dir: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
            out_dir: PathBuf::from("dist"),
            extensions: vec!["yaml".to_string(), "yml".to_string()],
            title: None,
            stylesheet: None,
            max_depth: parse.max_depth,
            max_nodes: parse.max_nodes,
            keep_anchor_declarations: parse.keep_anchor_declarations,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            hash: HashAlgorithm::default(),
        }
    }
}

impl SiteConfig {
    /// Load `yamlsite.json` from root, or defaults when it does not exist
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("no {} under {}, using defaults", CONFIG_FILE, root.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config: SiteConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config: {:?}", path))?;
        Ok(config)
    }

    /// Parser options derived from this config
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
            keep_anchor_declarations: self.keep_anchor_declarations,
        }
    }

    /// File reading limits derived from this config
    pub fn read_config(&self) -> FileReadConfig {
        FileReadConfig {
            max_file_size: self.max_file_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig::load(dir.path()).unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.templates_dir, PathBuf::from("templates"));
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.max_nodes, 100_000);
        assert!(config.keep_anchor_declarations);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"out_dir": "public", "title": "Docs", "keep_anchor_declarations": false, "hash": "sha1", "max_nodes": 500}"#,
        )
        .unwrap();

        let config = SiteConfig::load(dir.path()).unwrap();
        assert_eq!(config.out_dir, PathBuf::from("public"));
        assert_eq!(config.title.as_deref(), Some("Docs"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert!(!config.parse_options().keep_anchor_declarations);
        assert_eq!(config.hash, HashAlgorithm::Sha1);
        assert_eq!(config.parse_options().max_nodes, 500);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();

        let err = SiteConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_read_config() {
        let config = SiteConfig {
            max_file_size: 10,
            ..Default::default()
        };
        assert_eq!(config.read_config().max_file_size, 10);
    }
}
