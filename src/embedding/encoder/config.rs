use std::path::PathBuf;

use crate::constants::{DEFAULT_ENCODER_DIM, ENCODER_MAX_SEQ_LEN};

#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// BERT model directory. `None` selects the stub backend.
    pub model_path: Option<PathBuf>,

    /// Token limit per encoded text.
    pub max_seq_len: usize,

    /// Output width of the stub backend.
    pub stub_dim: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            max_seq_len: ENCODER_MAX_SEQ_LEN,
            stub_dim: DEFAULT_ENCODER_DIM,
        }
    }
}

impl EncoderConfig {
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    /// Uses `model_path` when present, otherwise the stub.
    pub fn from_optional_path(model_path: Option<PathBuf>) -> Self {
        Self {
            model_path,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_seq_len == 0 {
            return Err("max_seq_len must be greater than 0".to_string());
        }
        if self.stub_dim == 0 {
            return Err("stub_dim must be greater than 0".to_string());
        }
        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err("model_path cannot be empty when provided".to_string());
        }
        Ok(())
    }
}
