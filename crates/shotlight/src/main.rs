//! Shotlight CLI - tag, validate, and search shot images.
//!
//! Shotlight takes structured shot descriptions and their rendered image
//! variants, assigns controlled-vocabulary tags by CLIP similarity, flags
//! tags with weak evidence, and answers keyword queries over the tagged
//! corpus.
//!
//! # Usage
//!
//! ```bash
//! # Tag every image variant described by a records file
//! shotlight tag shots.jsonl ./images/ --output tagged.jsonl
//!
//! # Re-score a tagged corpus and report unreliable tags
//! shotlight validate tagged.jsonl ./images/ --output unreliable.jsonl
//!
//! # Search the tagged corpus
//! shotlight search "two people arguing" --corpus tagged.jsonl
//!
//! # Manage models
//! shotlight models download
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Shotlight - CLIP-based tagging, validation, and search for shot images.
#[derive(Parser, Debug)]
#[command(name = "shotlight")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Tag shot image variants against the tag catalog
    Tag(cli::tag::TagArgs),

    /// Re-score a tagged corpus and report unreliable tags
    Validate(cli::validate::ValidateArgs),

    /// Search the tagged corpus by keyword query
    Search(cli::search::SearchArgs),

    /// Manage CLIP models (download, list, etc.)
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match shotlight_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `shotlight config path`."
            );
            shotlight_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Shotlight v{}", shotlight_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Tag(args) => cli::tag::execute(args, config).await,
        Commands::Validate(args) => cli::validate::execute(args, config).await,
        Commands::Search(args) => cli::search::execute(args, config),
        Commands::Models(args) => cli::models::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args),
    }
}
