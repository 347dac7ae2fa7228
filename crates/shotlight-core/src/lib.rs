//! Shotlight Core - tagging, validation, and search for shot images.
//!
//! Shotlight assigns controlled-vocabulary tags to images of narrative
//! shots by similarity in a shared image/text embedding space, flags tags
//! with weak similarity evidence, and answers free-text queries over the
//! tagged corpus by keyword-to-tag matching.
//!
//! # Architecture
//!
//! ```text
//! Shot records + images → Selector (CLIP top-k per category) → tagged rows
//! tagged rows + images  → Validator (top-k ∧ threshold rule) → unreliable tags
//! tagged rows + query   → Search Scorer (substring matching) → ranked results
//! ```
//!
//! The embedding model is injected through the [`embedding::EmbeddingProvider`]
//! trait; label embeddings are pre-computed once per run in a
//! [`tagging::LabelBank`] shared by the selector and validator.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shotlight_core::{catalog::TagCatalog, Config};
//! use shotlight_core::embedding::ClipEngine;
//! use shotlight_core::tagging::{LabelBank, TagSelector, TopKPolicy};
//!
//! let config = Config::load()?;
//! let catalog = TagCatalog::load(&config.catalog_path())?;
//! let engine = Arc::new(ClipEngine::load(&config.embedding, &config.model_dir())?);
//! let bank = Arc::new(LabelBank::encode_catalog(&catalog, engine.as_ref())?);
//! let selector = TagSelector::new(bank, TopKPolicy::from(&config.tagging));
//! ```

pub mod catalog;
pub mod config;
pub mod embedding;
pub mod error;
pub mod math;
pub mod output;
pub mod pipeline;
pub mod search;
pub mod tagging;
pub mod tagstring;
pub mod types;

// Re-exports for convenient access
pub use catalog::TagCatalog;
pub use config::Config;
pub use embedding::{ClipEngine, EmbeddingProvider};
pub use error::{ConfigError, EngineError, EngineResult, Result, ShotlightError};
pub use output::OutputFormat;
pub use pipeline::ShotTagger;
pub use search::{search, SearchOutcome};
pub use tagging::{LabelBank, TagSelector, TagValidator, TopKPolicy};
pub use types::{
    CategoryTags, RunStats, SearchResult, ShotRecord, TaggedShot, TaggingResult, UnreliableTag,
    ValidationRecord, ValidationResult,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
