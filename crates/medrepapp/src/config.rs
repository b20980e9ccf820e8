//! # Configuration
//!
//! Medrep configuration is managed by [`confique`], which handles layered loading
//! from a TOML file, environment variables and programmatic overrides.
//!
//! ## Resolution Order
//!
//! Highest priority first:
//! 1. **Overrides**: values passed by the caller (e.g. `--base-url`).
//! 2. **Environment variables**: `MEDREP_BASE_URL`, `MEDREP_SEARCH_COLUMN`.
//! 3. **Config file**: an explicit path, else `medrep.toml` in the OS config
//!    directory (via `directories`). A missing file is skipped.
//! 4. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `base_url` | `http://localhost:5000` | Root URL of the doctors API |
//! | `search_column` | `name` | Column the list view searches on at start |

use crate::error::Result;
use crate::model::SearchColumn;
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "medrep.toml";

/// Configuration for medrep, stored in `medrep.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MedrepConfig {
    /// Root URL of the doctors API. Requests go to `{base_url}/api/doctors`.
    #[config(env = "MEDREP_BASE_URL", default = "http://localhost:5000")]
    pub base_url: String,

    /// Column the list view searches on: "name", "code", "registration" or "tax-id".
    #[config(env = "MEDREP_SEARCH_COLUMN", default = "name")]
    pub search_column: SearchColumn,
}

impl Default for MedrepConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            search_column: SearchColumn::Name,
        }
    }
}

/// Caller-supplied values that beat every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
}

impl MedrepConfig {
    /// Default location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "medrep", "medrep")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    /// Resolve configuration from overrides, environment, and `file` (or the
    /// default path when `file` is `None`).
    pub fn load(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut builder = MedrepConfig::builder().env();
        let path = file.map(Path::to_path_buf).or_else(Self::default_path);
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "reading config file");
            builder = builder.file(path);
        }

        let mut config = builder.load()?;
        if let Some(base_url) = &overrides.base_url {
            config.base_url = base_url.clone();
        }
        config.base_url = normalize_base_url(&config.base_url);
        Ok(config)
    }

    /// A commented TOML template with every setting and its default.
    pub fn template() -> String {
        confique::toml::template::<MedrepConfig>(confique::toml::FormatOptions::default())
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = MedrepConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.search_column, SearchColumn::Name);
    }

    #[test]
    fn test_file_values_are_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            "base_url = \"http://api.example.test/\"\nsearch_column = \"tax-id\"\n",
        )
        .unwrap();

        let config = MedrepConfig::load(Some(&path), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.search_column, SearchColumn::TaxId);
        // Environment may override base_url in CI; only check normalization when it doesn't.
        if std::env::var_os("MEDREP_BASE_URL").is_none() {
            assert_eq!(config.base_url, "http://api.example.test");
        }
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        let config = MedrepConfig::load(Some(&path), &ConfigOverrides::default()).unwrap();
        if std::env::var_os("MEDREP_BASE_URL").is_none() {
            assert_eq!(config.base_url, "http://localhost:5000");
        }
    }

    #[test]
    fn test_override_beats_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "base_url = \"http://from-file.test\"\n").unwrap();

        let overrides = ConfigOverrides {
            base_url: Some("http://override.test/".to_string()),
        };
        let config = MedrepConfig::load(Some(&path), &overrides).unwrap();
        assert_eq!(config.base_url, "http://override.test");
    }

    #[test]
    fn test_template_mentions_settings() {
        let template = MedrepConfig::template();
        assert!(template.contains("base_url"));
        assert!(template.contains("search_column"));
    }
}
