//! Error types for embedding models.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur while loading a model or encoding text.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Model directory or file not found at the specified path.
    #[error("Model file not found: {path}")]
    ModelNotFound {
        /// Path that was searched for the model.
        path: String,
    },

    /// Tokenizer file not found or invalid.
    #[error("Tokenizer error: {message}")]
    TokenizerError {
        /// Description of the tokenizer error.
        message: String,
    },

    /// Error loading model weights.
    #[error("Failed to load model weights: {message}")]
    WeightLoadError {
        /// Description of the weight loading error.
        message: String,
    },

    /// Error during model inference.
    #[error("Inference error: {message}")]
    InferenceError {
        /// Description of the inference error.
        message: String,
    },

    /// Invalid model configuration.
    #[error("Invalid model configuration: {message}")]
    ConfigError {
        /// Description of the configuration error.
        message: String,
    },

    /// The model produced a vector whose length differs from its declared dimension.
    #[error("Model returned {actual} dimensions, expected {expected}")]
    UnexpectedDimension {
        /// Dimension declared by the model.
        expected: usize,
        /// Length of the vector actually produced.
        actual: usize,
    },

    /// IO error reading model files.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Candle tensor operation error.
    #[error("Tensor error: {message}")]
    TensorError {
        /// Description of the tensor error.
        message: String,
    },
}

#[cfg(feature = "bert")]
impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::TensorError {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "bert")]
impl From<tokenizers::Error> for EmbeddingError {
    fn from(err: tokenizers::Error) -> Self {
        EmbeddingError::TokenizerError {
            message: err.to_string(),
        }
    }
}
