//! Pre-computed label embeddings, grouped by catalog category.
//!
//! Label-side embeddings are invariant across images, so the bank is encoded
//! once per process, one batched text call per category, and shared by the
//! selector and validator for every image in the run.

use crate::catalog::TagCatalog;
use crate::embedding::EmbeddingProvider;
use crate::error::EngineError;
use crate::math;

/// One category's labels with their embedding matrix.
pub struct CategoryBank {
    name: String,
    labels: Vec<String>,
    /// Flat matrix: label_count × dim, row-major.
    matrix: Vec<f32>,
}

impl CategoryBank {
    /// Category name as it appears in the catalog.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Labels in catalog order (the tie-break order).
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Similarity of an image embedding against every label, in label order.
    pub fn scores(&self, image_embedding: &[f32], dim: usize) -> Vec<f32> {
        self.matrix
            .chunks_exact(dim)
            .map(|row| math::dot(image_embedding, row))
            .collect()
    }
}

/// Pre-computed label embeddings for the whole catalog.
pub struct LabelBank {
    categories: Vec<CategoryBank>,
    embedding_dim: usize,
}

impl LabelBank {
    /// Encode every catalog label and build the bank.
    ///
    /// One batched `embed_texts` call per category; label order is preserved
    /// so matrix rows line up with catalog indices.
    pub fn encode_catalog(
        catalog: &TagCatalog,
        provider: &dyn EmbeddingProvider,
    ) -> Result<Self, EngineError> {
        let mut categories = Vec::with_capacity(catalog.len());
        let mut embedding_dim = 0usize;

        for category in catalog.categories() {
            let embeddings = provider.embed_texts(&category.labels)?;
            if embeddings.len() != category.labels.len() {
                return Err(EngineError::Model {
                    message: format!(
                        "Provider returned {} embeddings for {} labels in category {:?}",
                        embeddings.len(),
                        category.labels.len(),
                        category.name
                    ),
                });
            }

            let mut matrix = Vec::new();
            for emb in &embeddings {
                if embedding_dim == 0 {
                    embedding_dim = emb.len();
                } else if emb.len() != embedding_dim {
                    return Err(EngineError::Model {
                        message: format!(
                            "Embedding dimension mismatch in category {:?}: {} vs {}",
                            category.name,
                            emb.len(),
                            embedding_dim
                        ),
                    });
                }
                matrix.extend_from_slice(emb);
            }

            categories.push(CategoryBank {
                name: category.name.clone(),
                labels: category.labels.clone(),
                matrix,
            });
        }

        let label_count: usize = categories.iter().map(|c| c.labels.len()).sum();
        tracing::info!(
            "Label bank ready: {} categories, {} labels x {} dims",
            categories.len(),
            label_count,
            embedding_dim
        );

        Ok(Self {
            categories,
            embedding_dim,
        })
    }

    /// Build a bank from raw per-category matrices (for testing).
    #[cfg(test)]
    pub fn from_raw(categories: Vec<(String, Vec<String>, Vec<f32>)>, dim: usize) -> Self {
        let categories = categories
            .into_iter()
            .map(|(name, labels, matrix)| {
                assert_eq!(matrix.len(), labels.len() * dim);
                CategoryBank {
                    name,
                    labels,
                    matrix,
                }
            })
            .collect();
        Self {
            categories,
            embedding_dim: dim,
        }
    }

    /// Per-category banks, in catalog order.
    pub fn categories(&self) -> &[CategoryBank] {
        &self.categories
    }

    /// Embedding dimension (0 only if every category was empty).
    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }
}
