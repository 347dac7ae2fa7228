//! Tag reliability validation.
//!
//! Re-scores an already-tagged image against the full catalog and flags
//! labels with weak similarity evidence. The rule is conjunctive: a label is
//! unreliable only if it is outside the category's top-k AND its score is
//! below the threshold. A top-k label is always trusted regardless of its
//! absolute score (some categories have no strong match but one label must
//! still be chosen), and any label clearing the threshold is trusted even
//! outside the top-k.

use std::sync::Arc;

use crate::math;
use crate::types::UnreliableTag;

use super::label_bank::LabelBank;
use super::TopKPolicy;

/// Default similarity floor for out-of-top-k labels.
pub const DEFAULT_THRESHOLD: f32 = 0.25;

/// Flags weakly-evidenced labels for one image embedding.
///
/// Shares the selector's [`TopKPolicy`] so the top-k set here is exactly the
/// set the selector would pick.
pub struct TagValidator {
    bank: Arc<LabelBank>,
    policy: TopKPolicy,
    threshold: f32,
}

impl TagValidator {
    /// Create a validator over a pre-encoded label bank.
    pub fn new(bank: Arc<LabelBank>, policy: TopKPolicy, threshold: f32) -> Self {
        Self {
            bank,
            policy,
            threshold,
        }
    }

    /// Report every catalog label that is neither top-ranked nor above the
    /// threshold, with its score retained for downstream re-thresholding.
    pub fn validate(&self, image_embedding: &[f32]) -> Vec<UnreliableTag> {
        let dim = self.bank.embedding_dim();
        let mut unreliable = Vec::new();

        for category in self.bank.categories() {
            if category.labels().is_empty() {
                continue;
            }
            let scores = category.scores(image_embedding, dim);
            let k = self.policy.k_for(category.name());
            let top_indices = math::top_k_indices(&scores, k);

            for (i, label) in category.labels().iter().enumerate() {
                let score = scores[i];
                if !top_indices.contains(&i) && score < self.threshold {
                    unreliable.push(UnreliableTag {
                        category: category.name().to_string(),
                        label: label.clone(),
                        score,
                    });
                }
            }
        }

        unreliable
    }
}
