use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_transformers::models::bert::{BertModel, Config};
use candle_nn::VarBuilder;
use std::path::Path;

struct BertCls {
    bert: BertModel,
    hidden_size: usize,
}

impl BertCls {
    fn load(vb: VarBuilder, config: &Config) -> Result<Self> {
        // Checkpoints exported from task heads nest the encoder under a prefix.
        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), config)?
        } else {
            BertModel::load(vb.clone(), config)?
        };

        Ok(Self {
            bert,
            hidden_size: config.hidden_size,
        })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        output.i((.., 0, ..))
    }
}

/// BERT encoder pooled on the `[CLS]` token. Cheap to clone.
#[derive(Clone)]
pub struct BertEncoder(std::sync::Arc<BertCls>);

impl BertEncoder {
    /// Loads `config.json` and `model.safetensors` from `model_dir`.
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        let config_content = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let model = BertCls::load(vb, &config)?;

        Ok(Self(std::sync::Arc::new(model)))
    }

    /// Returns `[batch, hidden_size]` CLS vectors.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        self.0.forward(input_ids, token_type_ids, attention_mask)
    }

    pub fn hidden_size(&self) -> usize {
        self.0.hidden_size
    }
}
