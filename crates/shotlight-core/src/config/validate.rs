//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "processing.parallel_workers must be > 0".into(),
            ));
        }
        if self.processing.variants.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.variants must list at least one variant suffix".into(),
            ));
        }
        if self.embedding.image_size == 0 {
            return Err(ConfigError::ValidationError(
                "embedding.image_size must be > 0".into(),
            ));
        }
        if self.tagging.relational_top_k == 0 || self.tagging.default_top_k == 0 {
            return Err(ConfigError::ValidationError(
                "tagging top-k values must be > 0".into(),
            ));
        }
        if !(-1.0..=1.0).contains(&self.validation.threshold) {
            return Err(ConfigError::ValidationError(
                "validation.threshold must be a cosine similarity in [-1.0, 1.0]".into(),
            ));
        }
        if self.search.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "search.top_k must be > 0".into(),
            ));
        }
        Ok(())
    }
}
