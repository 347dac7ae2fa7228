//! The `shotlight models` command for managing CLIP models.

use std::path::Path;

use clap::{Args, Subcommand};
use shotlight_core::embedding::ClipEngine;
use shotlight_core::Config;

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Subcommands for model management.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// Download required models (CLIP vision + text encoder + tokenizer)
    Download,

    /// List installed models
    List,

    /// Show model directory path
    Path,
}

/// Source repository for the CLIP ViT-B/32 ONNX export.
const MODEL_REPO: &str = "Xenova/clip-vit-base-patch32";

/// Remote paths within the repository, in [vision, text, tokenizer] order
/// matching [`ClipEngine::model_paths`].
const REMOTE_PATHS: [&str; 3] = [
    "onnx/vision_model.onnx",
    "onnx/text_model.onnx",
    "tokenizer.json",
];

const FILE_LABELS: [&str; 3] = ["Vision encoder", "Text encoder", "Tokenizer"];

/// Execute the models command.
pub async fn execute(args: ModelsArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::Download => download_all(&config).await,

        ModelsCommand::List => {
            let model_dir = config.model_dir();
            if !model_dir.exists() {
                println!("No models installed.");
                println!("Run `shotlight models download` to download required models.");
                return Ok(());
            }

            println!("Installed models:");
            println!("  Directory: {}\n", model_dir.display());
            let paths = ClipEngine::model_paths(&config.embedding, &model_dir);
            for (label, path) in FILE_LABELS.iter().zip(paths.iter()) {
                let status = if path.exists() { "ready" } else { "not installed" };
                println!("  - {:<16} {:<14} {}", label, status, path.display());
            }
            Ok(())
        }

        ModelsCommand::Path => {
            println!("{}", config.model_dir().display());
            Ok(())
        }
    }
}

/// Download every missing model file, skipping ones already on disk.
async fn download_all(config: &Config) -> anyhow::Result<()> {
    let model_dir = config.model_dir();
    let paths = ClipEngine::model_paths(&config.embedding, &model_dir);
    let client = reqwest::Client::new();

    for ((label, remote), dest) in FILE_LABELS.iter().zip(REMOTE_PATHS).zip(paths.iter()) {
        if dest.exists() {
            tracing::info!("{} already exists at {:?}", label, dest);
            continue;
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let url = format!("https://huggingface.co/{MODEL_REPO}/resolve/main/{remote}");
        tracing::info!("Downloading {}...", label);
        tracing::info!("  Source: {}", url);
        tracing::info!("  Destination: {:?}", dest);

        download_file(&client, &url, dest).await?;

        let file_size = std::fs::metadata(dest)?.len();
        tracing::info!(
            "  {} complete ({:.1} MB)",
            label,
            file_size as f64 / (1024.0 * 1024.0)
        );
    }

    if ClipEngine::models_exist(&config.embedding, &model_dir) {
        tracing::info!("All models ready.");
    }
    Ok(())
}

/// Download a file from a URL to a local path, streaming to disk with a
/// progress bar when the size is known.
async fn download_file(client: &reqwest::Client, url: &str, dest: &Path) -> anyhow::Result<()> {
    use futures_util::StreamExt;
    use tokio::io::AsyncWriteExt;

    let response = client
        .get(url)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| anyhow::anyhow!("Download failed: {e}"))?;

    let progress = match response.content_length() {
        Some(size) => create_download_bar(size),
        None => indicatif::ProgressBar::new_spinner(),
    };

    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        progress.inc(chunk.len() as u64);
    }

    file.flush().await?;
    progress.finish_and_clear();
    Ok(())
}

/// Create a byte-based progress bar for a download of known size.
fn create_download_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("  [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%)")
    {
        pb.set_style(style.progress_chars("##-"));
    }
    pb
}
