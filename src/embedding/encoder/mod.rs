//! Local sentence encoder used by the reranker.
//!
//! Loads a BERT checkpoint and pools on `[CLS]`; without a model directory it runs a
//! deterministic stub so the pipeline stays usable offline.

pub mod config;

pub use config::EncoderConfig;

use std::sync::Arc;

use candle_core::{Device, Tensor};
use tokenizers::{Encoding, Tokenizer};
use tracing::{debug, info, warn};

use super::bert::BertEncoder;
use super::device::{device_label, select_device};
use super::error::EmbeddingError;
use super::stub::hashed_bag_of_words;
use super::utils::load_tokenizer_for_encoder;

enum EncoderBackend {
    Model {
        model: BertEncoder,
        tokenizer: Arc<Tokenizer>,
        device: Device,
    },
    Stub {
        dim: usize,
    },
}

/// Text-to-vector encoder. Forward passes are synchronous; call from blocking tasks.
pub struct SentenceEncoder {
    backend: EncoderBackend,
    config: EncoderConfig,
}

impl std::fmt::Debug for SentenceEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEncoder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({})", device_label(device)),
                    EncoderBackend::Stub { dim } => format!("Stub({dim})"),
                },
            )
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEncoder {
    pub fn load(config: EncoderConfig) -> Result<Self, EmbeddingError> {
        config
            .validate()
            .map_err(|reason| EmbeddingError::InvalidConfig { reason })?;

        let Some(model_path) = config.model_path.clone() else {
            warn!("No encoder model configured, reranker running in stub mode");
            return Ok(Self::stub_with(config));
        };

        for required in ["config.json", "model.safetensors", "tokenizer.json"] {
            if !model_path.join(required).exists() {
                return Err(EmbeddingError::ModelLoadFailed {
                    reason: format!("missing {required} in {}", model_path.display()),
                });
            }
        }

        let device = select_device()?;
        debug!(device = device_label(&device), "Selected compute device for encoder");

        let model =
            BertEncoder::load(&model_path, &device).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("failed to load BERT model: {e}"),
            })?;

        let tokenizer = load_tokenizer_for_encoder(&model_path, config.max_seq_len).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("failed to load tokenizer: {e}"),
            }
        })?;

        info!(
            model_path = %model_path.display(),
            hidden_size = model.hidden_size(),
            max_seq_len = config.max_seq_len,
            "Encoder model loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer: Arc::new(tokenizer),
                device,
            },
            config,
        })
    }

    /// Deterministic encoder with no model files.
    pub fn stub() -> Self {
        Self::stub_with(EncoderConfig::stub())
    }

    fn stub_with(config: EncoderConfig) -> Self {
        Self {
            backend: EncoderBackend::Stub {
                dim: config.stub_dim,
            },
            config,
        }
    }

    pub fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.encode_batch(&[text])?;
        vectors.pop().ok_or_else(|| EmbeddingError::InferenceFailed {
            reason: "encoder returned no vector".to_string(),
        })
    }

    /// Encodes `texts` in one forward pass, one vector per input.
    pub fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        match &self.backend {
            EncoderBackend::Model {
                model,
                tokenizer,
                device,
            } => Self::encode_with_model(texts, model, tokenizer, device),
            EncoderBackend::Stub { dim } => Ok(texts
                .iter()
                .map(|text| hashed_bag_of_words(text, *dim))
                .collect()),
        }
    }

    fn encode_with_model(
        texts: &[&str],
        model: &BertEncoder,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let encodings = tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            })?;

        let input_ids = stack(&encodings, Encoding::get_ids, device)?;
        let type_ids = stack(&encodings, Encoding::get_type_ids, device)?;
        let attention_mask = stack(&encodings, Encoding::get_attention_mask, device)?;

        let cls = model
            .forward(&input_ids, &type_ids, Some(&attention_mask))
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: e.to_string(),
            })?;

        Ok(cls.to_vec2::<f32>()?)
    }

    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub { .. })
    }

    pub fn dimension(&self) -> usize {
        match &self.backend {
            EncoderBackend::Model { model, .. } => model.hidden_size(),
            EncoderBackend::Stub { dim } => *dim,
        }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

/// Packs one field of equally padded encodings into a `[batch, seq_len]` tensor.
fn stack(
    encodings: &[Encoding],
    field: fn(&Encoding) -> &[u32],
    device: &Device,
) -> Result<Tensor, EmbeddingError> {
    let seq_len = encodings.first().map(|e| field(e).len()).unwrap_or(0);
    let data: Vec<u32> = encodings
        .iter()
        .flat_map(|e| field(e).iter().copied())
        .collect();

    if data.len() != seq_len * encodings.len() {
        return Err(EmbeddingError::TokenizationFailed {
            reason: "encodings are not padded to a common length".to_string(),
        });
    }

    Ok(Tensor::from_vec(data, (encodings.len(), seq_len), device)?)
}
