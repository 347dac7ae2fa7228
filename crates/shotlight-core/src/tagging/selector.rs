//! Tag selection: per-category top-k labels by cosine similarity.

use std::sync::Arc;

use crate::math;
use crate::types::CategoryTags;

use super::label_bank::LabelBank;
use super::TopKPolicy;

/// Selects the top-k labels per catalog category for one image embedding.
///
/// Selection is deterministic: exact similarity ties prefer the lower
/// catalog index, so repeated runs over the same image and catalog produce
/// identical output.
pub struct TagSelector {
    bank: Arc<LabelBank>,
    policy: TopKPolicy,
}

impl TagSelector {
    /// Create a selector over a pre-encoded label bank.
    pub fn new(bank: Arc<LabelBank>, policy: TopKPolicy) -> Self {
        Self { bank, policy }
    }

    /// Select labels for every category, in catalog category order.
    ///
    /// Each entry's labels are in descending-similarity order. Categories
    /// with no labels contribute no entry.
    pub fn select(&self, image_embedding: &[f32]) -> Vec<CategoryTags> {
        let dim = self.bank.embedding_dim();
        let mut selected = Vec::with_capacity(self.bank.categories().len());

        for category in self.bank.categories() {
            if category.labels().is_empty() {
                continue;
            }
            let scores = category.scores(image_embedding, dim);
            let k = self.policy.k_for(category.name());
            let labels = math::top_k_indices(&scores, k)
                .into_iter()
                .map(|i| category.labels()[i].clone())
                .collect();

            selected.push(CategoryTags {
                category: category.name().to_string(),
                labels,
            });
        }

        selected
    }
}
