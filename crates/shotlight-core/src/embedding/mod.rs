//! Image/text embedding in a shared similarity space.
//!
//! The engine is exposed through the [`EmbeddingProvider`] capability so the
//! selector and validator never touch model state directly: tests inject a
//! deterministic mock, production injects [`ClipEngine`] (CLIP ViT-B/32
//! vision + text encoders running locally via ONNX Runtime). All returned
//! vectors are L2-normalized, so dot products are cosine similarities.

pub(crate) mod preprocess;
pub(crate) mod text;
pub(crate) mod vision;

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::config::EmbeddingConfig;
use crate::error::EngineError;

use self::preprocess::preprocess;
use self::text::ClipTextEncoder;
use self::vision::ClipVisionSession;

/// The vision encoder ONNX model filename.
const VISION_MODEL_FILENAME: &str = "visual.onnx";
/// The text encoder ONNX model filename.
const TEXT_MODEL_FILENAME: &str = "text_model.onnx";
/// The tokenizer filename.
const TOKENIZER_FILENAME: &str = "tokenizer.json";

/// CLIP ViT-B/32 embedding dimension.
pub const EMBEDDING_DIM: usize = 512;

/// A joint image/text embedding capability.
///
/// Both methods return unit-norm vectors in the same space. Failures are
/// propagated as errors, never as degenerate zero vectors.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one image. `path` is carried for error context only.
    fn embed_image(&self, image: &DynamicImage, path: &Path) -> Result<Vec<f32>, EngineError>;

    /// Embed a batch of text labels, one vector per label, input order preserved.
    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError>;
}

/// CLIP engine: vision and text encoders sharing one embedding space.
pub struct ClipEngine {
    vision: ClipVisionSession,
    text: ClipTextEncoder,
    image_size: u32,
}

impl ClipEngine {
    /// Load both encoders from the model directory.
    ///
    /// Expects `{model_dir}/{model}/visual.onnx` plus `text_model.onnx` and
    /// `tokenizer.json` in `model_dir`.
    pub fn load(config: &EmbeddingConfig, model_dir: &Path) -> Result<Self, EngineError> {
        let vision_path = model_dir.join(&config.model).join(VISION_MODEL_FILENAME);
        if !vision_path.exists() {
            return Err(EngineError::Model {
                message: format!(
                    "Vision encoder not found at {:?}. Run `shotlight models download` first.",
                    vision_path
                ),
            });
        }

        tracing::info!("Loading CLIP vision encoder from {:?}", vision_path);
        let vision = ClipVisionSession::load(&vision_path)?;

        let text = ClipTextEncoder::new(
            &model_dir.join(TEXT_MODEL_FILENAME),
            &model_dir.join(TOKENIZER_FILENAME),
        )?;
        tracing::info!("CLIP encoders loaded");

        Ok(Self {
            vision,
            text,
            image_size: config.image_size,
        })
    }

    /// The image input size for this model.
    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    /// Check whether all model files exist on disk.
    pub fn models_exist(config: &EmbeddingConfig, model_dir: &Path) -> bool {
        model_dir
            .join(&config.model)
            .join(VISION_MODEL_FILENAME)
            .exists()
            && model_dir.join(TEXT_MODEL_FILENAME).exists()
            && model_dir.join(TOKENIZER_FILENAME).exists()
    }

    /// Expected model file paths (vision, text, tokenizer) for download/listing.
    pub fn model_paths(config: &EmbeddingConfig, model_dir: &Path) -> [PathBuf; 3] {
        [
            model_dir.join(&config.model).join(VISION_MODEL_FILENAME),
            model_dir.join(TEXT_MODEL_FILENAME),
            model_dir.join(TOKENIZER_FILENAME),
        ]
    }
}

impl EmbeddingProvider for ClipEngine {
    fn embed_image(&self, image: &DynamicImage, path: &Path) -> Result<Vec<f32>, EngineError> {
        let tensor = preprocess(image, self.image_size);
        self.vision.embed(&tensor, path)
    }

    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        self.text.encode_batch(texts)
    }
}
