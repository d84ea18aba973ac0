//! BERT sentence encoder on candle.
//!
//! Expects a sentence-transformers style directory:
//! - `config.json`: BERT configuration
//! - `tokenizer.json`: HuggingFace tokenizer
//! - `model.safetensors`: weights
//!
//! all-MiniLM-L6-v2 is the intended model; any BERT checkpoint with the same
//! layout works.

use super::{EmbeddingError, EmbeddingModel, Result, MAX_SEQUENCE_LENGTH};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use std::path::Path;
use tokenizers::Tokenizer;
use tracing::{debug, info};

/// Mean-pooled BERT embedder.
pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    hidden_size: usize,
    name: String,
}

impl BertEmbedder {
    /// Load config, tokenizer and weights from `model_dir`.
    pub fn load<P: AsRef<Path>>(model_dir: P) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        info!("Loading embedding model from: {}", model_dir.display());

        if !model_dir.exists() {
            return Err(EmbeddingError::ModelNotFound {
                path: model_dir.display().to_string(),
            });
        }

        let config_path = model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)
            .map_err(|e| EmbeddingError::ConfigError {
                message: format!(
                    "Failed to load config from {}: {}",
                    config_path.display(),
                    e
                ),
            })?;
        debug!(hidden_size = config.hidden_size, "Loaded BERT config");

        let tokenizer_path = model_dir.join("tokenizer.json");
        if !tokenizer_path.exists() {
            return Err(EmbeddingError::TokenizerError {
                message: format!("Tokenizer file not found: {}", tokenizer_path.display()),
            });
        }
        let tokenizer = Tokenizer::from_file(&tokenizer_path)?;

        let device = Device::Cpu;
        let weights_path = model_dir.join("model.safetensors");
        if !weights_path.exists() {
            return Err(EmbeddingError::WeightLoadError {
                message: format!("Expected model.safetensors in {}", model_dir.display()),
            });
        }
        let data = std::fs::read(&weights_path)?;
        let tensors = candle_core::safetensors::load_buffer(&data, &device).map_err(|e| {
            EmbeddingError::WeightLoadError {
                message: format!("Failed to load safetensors: {}", e),
            }
        })?;
        let vb = VarBuilder::from_tensors(tensors, DType::F32, &device);

        let model = BertModel::load(vb, &config).map_err(|e| EmbeddingError::WeightLoadError {
            message: format!("Failed to load BERT model: {}", e),
        })?;

        let name = model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bert".to_string());

        info!(model = %name, hidden_size = config.hidden_size, "Embedding model loaded");

        Ok(Self {
            model,
            tokenizer,
            device,
            hidden_size: config.hidden_size,
            name,
        })
    }

    fn tokenize(&self, text: &str) -> Result<(Vec<u32>, Vec<u32>, Vec<u32>)> {
        let encoding =
            self.tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizerError {
                    message: format!("Encoding failed: {}", e),
                })?;

        let mut input_ids = encoding.get_ids().to_vec();
        let mut attention_mask = encoding.get_attention_mask().to_vec();
        let mut token_type_ids = encoding.get_type_ids().to_vec();

        if input_ids.len() > MAX_SEQUENCE_LENGTH {
            input_ids.truncate(MAX_SEQUENCE_LENGTH);
            attention_mask.truncate(MAX_SEQUENCE_LENGTH);
            token_type_ids.truncate(MAX_SEQUENCE_LENGTH);
        }

        Ok((input_ids, attention_mask, token_type_ids))
    }
}

impl EmbeddingModel for BertEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, attention_mask, token_type_ids) = self.tokenize(text)?;
        debug!(tokens = input_ids.len(), "Encoding text");

        let input_ids = Tensor::new(input_ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(attention_mask.as_slice(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(token_type_ids.as_slice(), &self.device)?.unsqueeze(0)?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| EmbeddingError::InferenceError {
                message: format!("Forward pass failed: {}", e),
            })?;

        // sum(hidden * mask) / sum(mask)
        let mask = attention_mask.unsqueeze(2)?.to_dtype(DType::F32)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let count = mask.sum(1)?;
        let pooled = summed.broadcast_div(&count)?.squeeze(0)?;

        Ok(pooled.to_vec1::<f32>()?)
    }

    fn dimension(&self) -> usize {
        self.hidden_size
    }

    fn name(&self) -> &str {
        &self.name
    }
}
