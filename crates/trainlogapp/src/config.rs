//! # Configuration
//!
//! Trainlog configuration is loaded with [`confique`], layering environment
//! variables over an optional TOML file over compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `TRAINLOG_DATA_DIR`, `TRAINLOG_SOURCE`, ...
//! 2. **Config file**: `trainlog.toml` in the OS config directory (via
//!    `directories`), or an explicit path.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `data_dir` | `TRAINLOG_DATA_DIR` | OS data dir | Where the `overlay`/`base` slots live |
//! | `source` | `TRAINLOG_SOURCE` | none | JSON file holding the coach's base document |
//! | `max_value_bytes` | `TRAINLOG_MAX_VALUE_BYTES` | 5 MiB | Largest value a slot accepts |
//! | `search_limit` | `TRAINLOG_SEARCH_LIMIT` | 50 | Default cap on search results |

use crate::error::{Result, TrainlogError};
use crate::source::{BaseSource, FileSource, UnconfiguredSource};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "trainlog.toml";
pub const DEFAULT_MAX_VALUE_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TrainlogConfig {
    /// Directory holding the persisted slots.
    #[config(env = "TRAINLOG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Base document JSON file.
    #[config(env = "TRAINLOG_SOURCE")]
    pub source: Option<PathBuf>,

    #[config(env = "TRAINLOG_MAX_VALUE_BYTES", default = 5242880)]
    pub max_value_bytes: usize,

    #[config(env = "TRAINLOG_SEARCH_LIMIT", default = 50)]
    pub search_limit: usize,
}

impl Default for TrainlogConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            source: None,
            max_value_bytes: DEFAULT_MAX_VALUE_BYTES,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "trainlog", "trainlog")
}

/// `trainlog.toml` in the OS config directory, if there is one.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl TrainlogConfig {
    /// Env over the default config file over defaults.
    pub fn load() -> Result<Self> {
        Self::load_with(default_config_path().as_deref())
    }

    /// Env over `file` (skipped when absent) over defaults.
    pub fn load_with(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        let config = builder
            .load()
            .map_err(|e| TrainlogError::Config(e.to_string()))?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Configured data directory, else the OS data directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                TrainlogError::Config(
                    "could not determine a data directory; set TRAINLOG_DATA_DIR".to_string(),
                )
            })
    }

    pub fn base_source(&self) -> Box<dyn BaseSource> {
        match &self.source {
            Some(path) => Box::new(FileSource::new(path)),
            None => Box::new(UnconfiguredSource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults() {
        let config = TrainlogConfig::default();
        assert_eq!(config.max_value_bytes, 5 * 1024 * 1024);
        assert_eq!(config.search_limit, 50);
        assert!(config.source.is_none());
    }

    #[test]
    fn toml_round_trip() {
        let config = TrainlogConfig {
            source: Some(PathBuf::from("/srv/coach/base.json")),
            search_limit: 10,
            ..Default::default()
        };
        let text = toml::to_string(&config).unwrap();
        let back: TrainlogConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn loads_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "data_dir = \"/tmp/trainlog-data\"\nsearch_limit = 7\n",
        )
        .unwrap();
        let config = TrainlogConfig::load_with(Some(&path)).unwrap();
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/trainlog-data"));
        assert_eq!(config.search_limit, 7);
        assert_eq!(config.max_value_bytes, DEFAULT_MAX_VALUE_BYTES);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainlogConfig::load_with(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.search_limit, DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn unconfigured_source_fails_to_fetch() {
        let config = TrainlogConfig::default();
        assert!(matches!(
            config.base_source().fetch(),
            Err(TrainlogError::Transport(_))
        ));
    }
}
