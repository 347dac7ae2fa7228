//! Tag selection and reliability validation.
//!
//! Both components score a single image embedding against pre-computed label
//! embeddings and rank per category. They share one [`TopKPolicy`] so a
//! label the selector would pick is never one the validator flags.

pub mod label_bank;
pub mod selector;
pub mod validator;

pub use label_bank::LabelBank;
pub use selector::TagSelector;
pub use validator::TagValidator;

use crate::config::TaggingConfig;

/// Per-category top-k rule.
///
/// Most categories are single-valued attributes (`k = 1`); the designated
/// relational category may hold co-occurring relations (`k = 2` by default).
#[derive(Debug, Clone)]
pub struct TopKPolicy {
    relational_category: String,
    relational_top_k: usize,
    default_top_k: usize,
}

impl TopKPolicy {
    pub fn new(
        relational_category: impl Into<String>,
        relational_top_k: usize,
        default_top_k: usize,
    ) -> Self {
        Self {
            relational_category: relational_category.into(),
            relational_top_k,
            default_top_k,
        }
    }

    /// Number of labels to select for the given category.
    pub fn k_for(&self, category: &str) -> usize {
        if category == self.relational_category {
            self.relational_top_k
        } else {
            self.default_top_k
        }
    }
}

impl From<&TaggingConfig> for TopKPolicy {
    fn from(config: &TaggingConfig) -> Self {
        Self::new(
            config.relational_category.clone(),
            config.relational_top_k,
            config.default_top_k,
        )
    }
}
