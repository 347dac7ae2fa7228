//! The `shotlight validate` command: re-score a tagged corpus and report
//! tags with weak similarity evidence.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use shotlight_core::catalog::TagCatalog;
use shotlight_core::embedding::ClipEngine;
use shotlight_core::pipeline::validate_corpus;
use shotlight_core::tagging::{LabelBank, TagValidator, TopKPolicy};
use shotlight_core::types::{TaggedShot, ValidationRecord};
use shotlight_core::Config;

/// Arguments for the `validate` command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Tagged corpus file produced by `shotlight tag`
    pub corpus: PathBuf,

    /// Directory holding the rendered image variants
    pub image_dir: PathBuf,

    /// Tag catalog path (overrides config)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Similarity threshold for the unreliable rule (overrides config)
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: json or jsonl (overrides config)
    #[arg(short, long)]
    pub format: Option<String>,
}

/// Execute the validate command.
pub async fn execute(args: ValidateArgs, config: Config) -> anyhow::Result<()> {
    let format = super::resolve_format(args.format.as_deref(), &config)?;

    let threshold = args.threshold.unwrap_or(config.validation.threshold);
    if !(-1.0..=1.0).contains(&threshold) {
        anyhow::bail!("Threshold {threshold} is outside the cosine range [-1, 1]");
    }

    let corpus: Vec<TaggedShot> = shotlight_core::output::read_records(&args.corpus)
        .with_context(|| format!("Failed to read tagged corpus from {}", args.corpus.display()))?;
    if corpus.is_empty() {
        anyhow::bail!("No tagged rows found in {}", args.corpus.display());
    }
    tracing::info!("Loaded {} tagged rows", corpus.len());

    let catalog_path = args.catalog.unwrap_or_else(|| config.catalog_path());
    let catalog = TagCatalog::load(&catalog_path)?;

    let engine = Arc::new(ClipEngine::load(&config.embedding, &config.model_dir())?);
    let bank = Arc::new(LabelBank::encode_catalog(&catalog, engine.as_ref())?);
    let validator = Arc::new(TagValidator::new(
        bank,
        TopKPolicy::from(&config.tagging),
        threshold,
    ));

    let (results, stats) = validate_corpus(
        engine,
        validator,
        &corpus,
        &args.image_dir,
        &config.processing.image_extension,
    )
    .await?;

    let flagged = results.iter().filter(|r| !r.unreliable.is_empty()).count();
    tracing::info!(
        "Validated {} images: {} with unreliable tags, {} missing, {} failed",
        stats.processed,
        flagged,
        stats.skipped_missing,
        stats.failed
    );

    // One row per image, even when no tag was flagged.
    let records: Vec<ValidationRecord> = results.iter().map(|r| r.to_record()).collect();
    super::emit(&records, args.output.as_deref(), format, config.output.pretty)
}
