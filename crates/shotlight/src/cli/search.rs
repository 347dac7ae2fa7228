//! The `shotlight search` command: keyword search over the tagged corpus.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use shotlight_core::catalog::TagCatalog;
use shotlight_core::search::{search, SearchOutcome};
use shotlight_core::types::TaggedShot;
use shotlight_core::Config;

/// Arguments for the `search` command.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query
    pub query: String,

    /// Tagged corpus file produced by `shotlight tag`
    #[arg(short, long)]
    pub corpus: PathBuf,

    /// Tag catalog path (overrides config)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Maximum number of results (overrides config)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Emit results as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Execute the search command.
pub fn execute(args: SearchArgs, config: Config) -> anyhow::Result<()> {
    let corpus: Vec<TaggedShot> = shotlight_core::output::read_records(&args.corpus)
        .with_context(|| format!("Failed to read tagged corpus from {}", args.corpus.display()))?;

    let catalog_path = args.catalog.unwrap_or_else(|| config.catalog_path());
    let catalog = TagCatalog::load(&catalog_path)?;

    let top_k = args.top_k.unwrap_or(config.search.top_k);
    match search(&args.query, &catalog, &corpus, top_k) {
        SearchOutcome::NoTagsMatched => {
            println!("No tags matched from query.");
        }
        SearchOutcome::Ranked {
            matched_tags,
            results,
        } => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(());
            }

            println!("Matched tags: {}", matched_tags.join(", "));
            if results.is_empty() {
                println!("No shots carry the matched tags.");
                return Ok(());
            }

            println!();
            println!("  {:<8} {:<6} {:<28} Tags", "Id", "Score", "Shot");
            for result in &results {
                println!(
                    "  {:<8} {:<6} {:<28} {}",
                    result.id,
                    result.score,
                    truncate(&result.shot_title, 28),
                    result.tags
                );
            }
        }
    }

    Ok(())
}

/// Truncate a string for table display, on a char boundary.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{cut}…")
}
