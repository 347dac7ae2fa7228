//! Batch orchestration over shot records and image variants.
//!
//! Per-image work (decode, embed, select) is independent across images, so
//! the tagger runs it on a bounded worker pool and restores input order when
//! aggregating, so persisted row order stays deterministic, which the search
//! scorer's tie-breaking depends on. Label embeddings are encoded once in
//! the label bank before any image is touched, never per image.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::embedding::EmbeddingProvider;
use crate::error::EngineError;
use crate::tagging::{TagSelector, TagValidator};
use crate::tagstring;
use crate::types::{RunStats, ShotRecord, TaggedShot, TaggingResult, ValidationResult};

/// One image variant queued for tagging.
struct WorkItem {
    index: usize,
    id: String,
    shot_title: String,
    description: String,
    path: PathBuf,
}

/// Per-image outcome inside a worker task.
enum TagOutcome {
    Tagged(Box<TaggedShot>),
    DecodeFailed,
}

/// Batch tagger: records × variants through decode, embed, and select.
pub struct ShotTagger {
    provider: Arc<dyn EmbeddingProvider>,
    selector: Arc<TagSelector>,
    variants: Vec<String>,
    image_extension: String,
    parallel_workers: usize,
}

impl ShotTagger {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        selector: Arc<TagSelector>,
        variants: Vec<String>,
        image_extension: impl Into<String>,
        parallel_workers: usize,
    ) -> Self {
        Self {
            provider,
            selector,
            variants,
            image_extension: image_extension.into(),
            parallel_workers: parallel_workers.max(1),
        }
    }

    /// Tag every present image variant of every record.
    ///
    /// Missing images are skipped and counted. Decode failures skip the
    /// image and count as failed. Provider failures abort the remaining
    /// work; rows produced before the failure are not returned here, but
    /// any rows a streaming caller already wrote remain valid.
    pub async fn tag_shots(
        &self,
        records: &[ShotRecord],
        image_dir: &Path,
    ) -> Result<(Vec<TaggedShot>, RunStats), EngineError> {
        let mut stats = RunStats::default();
        let mut items = Vec::new();

        for record in records {
            for variant in &self.variants {
                let id = format!("{}{}", record.id, variant);
                let path = image_dir.join(format!("{id}.{}", self.image_extension));
                if !path.exists() {
                    tracing::warn!("Image not found, skipping: {:?}", path);
                    stats.skipped_missing += 1;
                    continue;
                }
                items.push(WorkItem {
                    index: items.len(),
                    id,
                    shot_title: record.shot_title.clone(),
                    description: record.description.clone(),
                    path,
                });
            }
        }

        let mut slots: Vec<Option<TaggedShot>> = (0..items.len()).map(|_| None).collect();
        let semaphore = Arc::new(Semaphore::new(self.parallel_workers));
        let mut join_set: JoinSet<Result<(usize, TagOutcome), EngineError>> = JoinSet::new();

        for item in items {
            let semaphore = Arc::clone(&semaphore);
            let provider = Arc::clone(&self.provider);
            let selector = Arc::clone(&self.selector);

            join_set.spawn(async move {
                let _permit =
                    semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| EngineError::Embedding {
                            path: item.path.clone(),
                            message: format!("Worker pool closed: {e}"),
                        })?;

                tokio::task::spawn_blocking(move || {
                    let index = item.index;
                    match tag_one(provider.as_ref(), &selector, &item) {
                        Ok(row) => Ok((index, TagOutcome::Tagged(Box::new(row)))),
                        Err(EngineError::Decode { path, message }) => {
                            tracing::error!("Decode failed for {:?}: {}", path, message);
                            Ok((index, TagOutcome::DecodeFailed))
                        }
                        Err(e) => Err(e),
                    }
                })
                .await
                .map_err(|e| EngineError::Model {
                    message: format!("Task join error: {e}"),
                })?
            });
        }

        while let Some(joined) = join_set.join_next().await {
            let task_result = joined.map_err(|e| EngineError::Model {
                message: format!("Worker task failed: {e}"),
            })?;
            match task_result {
                Ok((index, TagOutcome::Tagged(row))) => {
                    stats.processed += 1;
                    slots[index] = Some(*row);
                }
                Ok((_, TagOutcome::DecodeFailed)) => {
                    stats.failed += 1;
                }
                Err(e) => {
                    // Fatal provider failure: stop the remaining work.
                    join_set.abort_all();
                    return Err(e);
                }
            }
        }

        let rows: Vec<TaggedShot> = slots.into_iter().flatten().collect();
        tracing::info!(
            "Tagging run complete: {} tagged, {} missing, {} failed",
            stats.processed,
            stats.skipped_missing,
            stats.failed
        );
        Ok((rows, stats))
    }
}

/// Decode, embed, and tag a single image variant.
fn tag_one(
    provider: &dyn EmbeddingProvider,
    selector: &TagSelector,
    item: &WorkItem,
) -> Result<TaggedShot, EngineError> {
    let image = image::open(&item.path).map_err(|e| EngineError::Decode {
        path: item.path.clone(),
        message: e.to_string(),
    })?;
    let embedding = provider.embed_image(&image, &item.path)?;
    let result = TaggingResult {
        id: item.id.clone(),
        tags: selector.select(&embedding),
    };
    let tag_string = tagstring::format(&result.tags)?;

    tracing::debug!("Tagged {:?}: {}", result.id, tag_string);
    Ok(TaggedShot {
        id: result.id,
        shot_title: item.shot_title.clone(),
        description: item.description.clone(),
        tags: tag_string,
    })
}

/// Re-score every row of a tagged corpus and report unreliable labels.
///
/// Images are addressed by the row id (which already carries the variant
/// suffix). Missing images skip the row; decode failures count as failed;
/// provider failures abort.
pub async fn validate_corpus(
    provider: Arc<dyn EmbeddingProvider>,
    validator: Arc<TagValidator>,
    corpus: &[TaggedShot],
    image_dir: &Path,
    image_extension: &str,
) -> Result<(Vec<ValidationResult>, RunStats), EngineError> {
    let mut stats = RunStats::default();
    let mut results = Vec::with_capacity(corpus.len());

    for row in corpus {
        let path = image_dir.join(format!("{}.{}", row.id, image_extension));
        if !path.exists() {
            tracing::warn!("Image not found, skipping: {:?}", path);
            stats.skipped_missing += 1;
            continue;
        }

        let id = row.id.clone();
        let provider = Arc::clone(&provider);
        let validator = Arc::clone(&validator);
        let task_path = path.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            let image = image::open(&task_path).map_err(|e| EngineError::Decode {
                path: task_path.clone(),
                message: e.to_string(),
            })?;
            let embedding = provider.embed_image(&image, &task_path)?;
            Ok::<_, EngineError>(validator.validate(&embedding))
        })
        .await
        .map_err(|e| EngineError::Model {
            message: format!("Task join error: {e}"),
        })?;

        match outcome {
            Ok(unreliable) => {
                stats.processed += 1;
                results.push(ValidationResult { id, unreliable });
            }
            Err(EngineError::Decode { path, message }) => {
                tracing::error!("Decode failed for {:?}: {}", path, message);
                stats.failed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        "Validation run complete: {} validated, {} missing, {} failed",
        stats.processed,
        stats.skipped_missing,
        stats.failed
    );
    Ok((results, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TagCatalog;
    use crate::tagging::{LabelBank, TopKPolicy};
    use image::{DynamicImage, RgbImage};

    /// Provider whose image embeddings depend on the mean pixel intensity.
    struct IntensityProvider;

    impl EmbeddingProvider for IntensityProvider {
        fn embed_image(
            &self,
            image: &DynamicImage,
            _path: &Path,
        ) -> Result<Vec<f32>, EngineError> {
            let rgb = image.to_rgb8();
            let mean: f32 = rgb.as_raw().iter().map(|&b| b as f32).sum::<f32>()
                / rgb.as_raw().len() as f32
                / 255.0;
            Ok(crate::math::l2_normalize(&[mean, 1.0 - mean]))
        }

        fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
            // "bright" aligns with axis 0, everything else with axis 1.
            Ok(texts
                .iter()
                .map(|t| {
                    if t.contains("bright") {
                        vec![1.0, 0.0]
                    } else {
                        vec![0.0, 1.0]
                    }
                })
                .collect())
        }
    }

    fn selector() -> Arc<TagSelector> {
        let catalog = TagCatalog::from_json(r#"{"Mood": ["bright", "dark"]}"#).unwrap();
        let bank = LabelBank::encode_catalog(&catalog, &IntensityProvider).unwrap();
        Arc::new(TagSelector::new(
            Arc::new(bank),
            TopKPolicy::new("Relational Expression", 2, 1),
        ))
    }

    fn write_png(dir: &Path, name: &str, value: u8) {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            8,
            8,
            image::Rgb([value, value, value]),
        ));
        img.save(dir.join(name)).unwrap();
    }

    fn record(id: &str) -> ShotRecord {
        ShotRecord {
            id: id.to_string(),
            shot_title: format!("Shot {id}"),
            description: "desc".to_string(),
        }
    }

    #[tokio::test]
    async fn test_tag_shots_skips_missing_variants() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "1.1a.png", 250);
        // Variants b and c absent

        let tagger = ShotTagger::new(
            Arc::new(IntensityProvider),
            selector(),
            vec!["a".into(), "b".into(), "c".into()],
            "png",
            2,
        );
        let (rows, stats) = tagger.tag_shots(&[record("1.1")], dir.path()).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "1.1a");
        assert_eq!(rows[0].tags, "Mood: bright");
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.skipped_missing, 2);
    }

    #[tokio::test]
    async fn test_tag_shots_preserves_input_order() {
        let dir = tempfile::tempdir().unwrap();
        for id in ["1.1", "1.2", "1.3"] {
            write_png(dir.path(), &format!("{id}a.png"), 10);
            write_png(dir.path(), &format!("{id}b.png"), 240);
        }

        let tagger = ShotTagger::new(
            Arc::new(IntensityProvider),
            selector(),
            vec!["a".into(), "b".into()],
            "png",
            4,
        );
        let records = [record("1.1"), record("1.2"), record("1.3")];
        let (rows, _) = tagger.tag_shots(&records, dir.path()).await.unwrap();

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1.1a", "1.1b", "1.2a", "1.2b", "1.3a", "1.3b"]);
        assert_eq!(rows[0].tags, "Mood: dark");
        assert_eq!(rows[1].tags, "Mood: bright");
    }

    #[tokio::test]
    async fn test_tag_shots_counts_decode_failures() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "1.1a.png", 200);
        std::fs::write(dir.path().join("1.2a.png"), b"not a png").unwrap();

        let tagger = ShotTagger::new(
            Arc::new(IntensityProvider),
            selector(),
            vec!["a".into()],
            "png",
            2,
        );
        let records = [record("1.1"), record("1.2")];
        let (rows, stats) = tagger.tag_shots(&records, dir.path()).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(stats.failed, 1);
    }

    #[tokio::test]
    async fn test_validate_corpus_skips_missing_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "1.1a.png", 250);

        let catalog = TagCatalog::from_json(r#"{"Mood": ["bright", "dark"]}"#).unwrap();
        let bank = Arc::new(LabelBank::encode_catalog(&catalog, &IntensityProvider).unwrap());
        let validator = Arc::new(TagValidator::new(
            bank,
            TopKPolicy::new("Relational Expression", 2, 1),
            0.25,
        ));

        let corpus = vec![
            TaggedShot {
                id: "1.1a".into(),
                shot_title: "t".into(),
                description: "d".into(),
                tags: "Mood: bright".into(),
            },
            TaggedShot {
                id: "9.9z".into(),
                shot_title: "t".into(),
                description: "d".into(),
                tags: "Mood: dark".into(),
            },
        ];

        let (results, stats) = validate_corpus(
            Arc::new(IntensityProvider),
            validator,
            &corpus,
            dir.path(),
            "png",
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "1.1a");
        // Bright image: "dark" is outside top-1 and scores near 0.
        assert_eq!(results[0].unreliable.len(), 1);
        assert_eq!(results[0].unreliable[0].label, "dark");
        assert_eq!(stats.skipped_missing, 1);
    }
}
