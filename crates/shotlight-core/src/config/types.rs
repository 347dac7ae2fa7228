//! Sub-configuration structs with defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where ONNX models are stored
    pub model_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("~/.shotlight/models"),
        }
    }
}

/// Batch processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of parallel workers for per-image work
    pub parallel_workers: usize,

    /// Image variant suffixes tried per shot record
    pub variants: Vec<String>,

    /// Image file extension
    pub image_extension: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 4,
            variants: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            image_extension: "png".to_string(),
        }
    }
}

/// Embedding model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Model name/variant
    pub model: String,

    /// Image input size expected by the vision encoder
    pub image_size: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "clip-vit-base-patch32".to_string(),
            image_size: 224,
        }
    }
}

/// Tag selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Path to the categorized tag catalog (JSON)
    pub catalog_path: String,

    /// Category allowed to hold co-occurring relations (gets a larger top-k)
    pub relational_category: String,

    /// Labels selected for the relational category
    pub relational_top_k: usize,

    /// Labels selected for every other category
    pub default_top_k: usize,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            catalog_path: "~/.shotlight/tags/tag_list.json".to_string(),
            relational_category: "Relational Expression".to_string(),
            relational_top_k: 2,
            default_top_k: 1,
        }
    }
}

/// Tag validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Similarity floor below which an out-of-top-k label is unreliable
    pub threshold: f32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { threshold: 0.25 }
    }
}

/// Search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of ranked results returned
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "jsonl".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
