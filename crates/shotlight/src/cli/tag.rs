//! The `shotlight tag` command: batch-tag shot image variants.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use shotlight_core::catalog::TagCatalog;
use shotlight_core::embedding::ClipEngine;
use shotlight_core::tagging::{LabelBank, TagSelector, TopKPolicy};
use shotlight_core::types::ShotRecord;
use shotlight_core::{Config, ShotTagger};

/// Arguments for the `tag` command.
#[derive(Args, Debug)]
pub struct TagArgs {
    /// Shot records file (JSON array or JSONL of id/shot_title/description)
    pub records: PathBuf,

    /// Directory holding the rendered image variants
    pub image_dir: PathBuf,

    /// Tag catalog path (overrides config)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: json or jsonl (overrides config)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Number of parallel workers (overrides config)
    #[arg(long)]
    pub workers: Option<usize>,
}

/// Execute the tag command.
pub async fn execute(args: TagArgs, config: Config) -> anyhow::Result<()> {
    let format = super::resolve_format(args.format.as_deref(), &config)?;

    let records: Vec<ShotRecord> = shotlight_core::output::read_records(&args.records)
        .with_context(|| format!("Failed to read shot records from {}", args.records.display()))?;
    if records.is_empty() {
        anyhow::bail!("No shot records found in {}", args.records.display());
    }
    tracing::info!("Loaded {} shot records", records.len());

    let catalog_path = args.catalog.unwrap_or_else(|| config.catalog_path());
    let catalog = TagCatalog::load(&catalog_path)?;

    let engine = Arc::new(ClipEngine::load(&config.embedding, &config.model_dir())?);

    // Label embeddings are encoded once up front, before any image work.
    let bank = Arc::new(LabelBank::encode_catalog(&catalog, engine.as_ref())?);
    let policy = TopKPolicy::from(&config.tagging);
    let selector = Arc::new(TagSelector::new(Arc::clone(&bank), policy));

    let workers = args.workers.unwrap_or(config.processing.parallel_workers);
    let tagger = ShotTagger::new(
        engine,
        selector,
        config.processing.variants.clone(),
        config.processing.image_extension.clone(),
        workers,
    );

    let started = std::time::Instant::now();
    let (rows, stats) = tagger.tag_shots(&records, &args.image_dir).await?;

    super::emit(&rows, args.output.as_deref(), format, config.output.pretty)?;

    print_summary(
        stats.processed,
        stats.skipped_missing,
        stats.failed,
        started.elapsed(),
    );
    Ok(())
}

/// Print a formatted summary after a tagging run.
fn print_summary(processed: usize, missing: usize, failed: usize, elapsed: std::time::Duration) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Tagged:       {:>8}", processed);
    if missing > 0 {
        eprintln!("    Missing:      {:>8}", missing);
    }
    if failed > 0 {
        eprintln!("    Failed:       {:>8}", failed);
    }
    eprintln!("    Elapsed:      {:>8.1}s", elapsed.as_secs_f64());
    eprintln!("  ====================================");
}
