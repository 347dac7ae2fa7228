//! Configuration management for Shotlight.
//!
//! Configuration is loaded from the platform config directory as TOML with
//! sensible defaults; every section tolerates omission via `#[serde(default)]`.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Shotlight.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Batch processing settings
    pub processing: ProcessingConfig,

    /// Embedding model settings
    pub embedding: EmbeddingConfig,

    /// Tag selection settings
    pub tagging: TaggingConfig,

    /// Tag validation settings
    pub validation: ValidationConfig,

    /// Search settings
    pub search: SearchConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Platform config dir (e.g., `~/.config/shotlight/config.toml` on
    /// Linux), falling back to `~/.shotlight/config.toml`.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("io", "shotlight", "shotlight")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".shotlight").join("config.toml")
            })
    }

    /// Get the resolved model directory path (with ~ expansion).
    pub fn model_dir(&self) -> PathBuf {
        let path_str = self.general.model_dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Get the resolved tag catalog path (with ~ expansion).
    pub fn catalog_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.tagging.catalog_path);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
