//! CLIP text encoder for generating label embeddings.
//!
//! Loads the CLIP text ONNX model and tokenizer and encodes batches of label
//! strings to 512-dimensional vectors aligned with the vision encoder's space.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Value;

use crate::error::EngineError;

use super::EMBEDDING_DIM;

/// CLIP context length in tokens.
const MAX_LENGTH: usize = 77;

/// CLIP text encoder wrapper.
///
/// Same `Mutex<Session>` pattern as the vision encoder.
pub struct ClipTextEncoder {
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
}

impl ClipTextEncoder {
    /// Load the text encoder and tokenizer.
    pub fn new(model_path: &Path, tokenizer_path: &Path) -> Result<Self, EngineError> {
        if !model_path.exists() {
            return Err(EngineError::Model {
                message: format!(
                    "Text encoder not found at {:?}. Run `shotlight models download` first.",
                    model_path
                ),
            });
        }
        if !tokenizer_path.exists() {
            return Err(EngineError::Model {
                message: format!(
                    "Tokenizer not found at {:?}. Run `shotlight models download` first.",
                    tokenizer_path
                ),
            });
        }

        let session = Session::builder()
            .map_err(|e| EngineError::Model {
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(model_path)
            .map_err(|e| EngineError::Model {
                message: format!("Failed to load text encoder model: {e}"),
            })?;

        let tokenizer =
            tokenizers::Tokenizer::from_file(tokenizer_path).map_err(|e| EngineError::Model {
                message: format!("Failed to load tokenizer: {e}"),
            })?;

        tracing::debug!(
            "Loaded CLIP text encoder (inputs: {:?})",
            session
                .inputs()
                .iter()
                .map(|i| i.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
        })
    }

    /// Encode a batch of label strings to normalized embeddings.
    ///
    /// Returns one 512-dim vector per input, in input order.
    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
        let batch_size = texts.len();

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EngineError::Model {
                message: format!("Tokenization failed: {e}"),
            })?;

        // Flat [batch, 77] tensors. CLIP takes input_ids and attention_mask.
        let mut input_ids = vec![0i64; batch_size * MAX_LENGTH];
        let mut attention_mask = vec![0i64; batch_size * MAX_LENGTH];

        for (i, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            for (j, &id) in ids.iter().take(MAX_LENGTH).enumerate() {
                input_ids[i * MAX_LENGTH + j] = id as i64;
                attention_mask[i * MAX_LENGTH + j] = 1;
            }
        }

        let shape = vec![batch_size as i64, MAX_LENGTH as i64];
        let ids_value =
            Value::from_array((shape.clone(), input_ids)).map_err(|e| EngineError::Model {
                message: format!("Failed to create input_ids tensor: {e}"),
            })?;
        let mask_value =
            Value::from_array((shape, attention_mask)).map_err(|e| EngineError::Model {
                message: format!("Failed to create attention_mask tensor: {e}"),
            })?;

        let mut session = self.session.lock().map_err(|e| EngineError::Model {
            message: format!("Text encoder lock poisoned: {e}"),
        })?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => ids_value,
                "attention_mask" => mask_value,
            ])
            .map_err(|e| EngineError::Model {
                message: format!("Text encoder inference failed: {e}"),
            })?;

        // The projected cross-modal embedding.
        let embeds = outputs
            .iter()
            .find(|(name, _)| *name == "text_embeds" || *name == "pooler_output")
            .ok_or_else(|| EngineError::Model {
                message: "Text encoder produced neither text_embeds nor pooler_output".to_string(),
            })?;

        let (_shape, data) =
            embeds
                .1
                .try_extract_tensor::<f32>()
                .map_err(|e| EngineError::Model {
                    message: format!("Failed to extract text embeddings: {e}"),
                })?;

        // Split the flat output into per-label embeddings and L2-normalize.
        let embeddings: Vec<Vec<f32>> = data
            .chunks(EMBEDDING_DIM)
            .take(batch_size)
            .map(crate::math::l2_normalize)
            .collect();

        if embeddings.len() != batch_size {
            return Err(EngineError::Model {
                message: format!(
                    "Text encoder returned {} embeddings for {} inputs",
                    embeddings.len(),
                    batch_size
                ),
            });
        }

        Ok(embeddings)
    }
}
