//! Error types for the Shotlight tagging engine.
//!
//! Errors are organized by stage with enough context (paths, categories,
//! messages) to act on. Empty results are never modeled as errors: a query
//! that matches no tags or a validation pass that finds nothing unreliable
//! returns an empty value, not an `Err`.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Shotlight operations.
#[derive(Error, Debug)]
pub enum ShotlightError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tagging/validation engine errors
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Engine errors, organized by stage.
///
/// `Catalog` is fatal at startup; `ImageNotFound` is skippable per record;
/// `Embedding` and `Model` are provider failures that the orchestration
/// loop decides how to handle.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Tag catalog missing or malformed
    #[error("Catalog error for {path}: {message}")]
    Catalog { path: PathBuf, message: String },

    /// Image file absent (callers skip the record)
    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Image embedding failed
    #[error("Embedding failed for {path}: {message}")]
    Embedding { path: PathBuf, message: String },

    /// Model loading or text-side inference failed
    #[error("Model error: {message}")]
    Model { message: String },

    /// Tag-string serialization would not round-trip
    #[error("Tag format error: {message}")]
    TagFormat { message: String },
}

/// Convenience type alias for Shotlight results.
pub type Result<T> = std::result::Result<T, ShotlightError>;

/// Convenience type alias for engine-stage results.
pub type EngineResult<T> = std::result::Result<T, EngineError>;
