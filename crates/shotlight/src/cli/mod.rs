//! Command implementations for the Shotlight CLI.

pub mod config;
pub mod models;
pub mod search;
pub mod tag;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use shotlight_core::{Config, OutputFormat};

/// Resolve the output format: CLI flag first, then config, then JSONL.
pub(crate) fn resolve_format(flag: Option<&str>, config: &Config) -> anyhow::Result<OutputFormat> {
    let name = flag.unwrap_or(&config.output.format);
    OutputFormat::parse(name)
        .with_context(|| format!("Unknown output format {name:?} (expected json or jsonl)"))
}

/// Write records to `--output` if given, otherwise to stdout.
pub(crate) fn emit<T: serde::Serialize>(
    records: &[T],
    output: Option<&Path>,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            shotlight_core::output::write_records_to_path(path, records, format, pretty)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            tracing::info!("Wrote {} records to {}", records.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            shotlight_core::output::write_records(&mut stdout, records, format, pretty)
                .context("Failed to write output to stdout")?;
        }
    }
    Ok(())
}
