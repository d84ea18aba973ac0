//! Text embedding for plot summaries.
//!
//! An [`EmbeddingModel`] turns text into a raw vector of fixed dimension.
//! The [`Embedder`] wraps a model and applies L2 normalization, so every
//! vector it hands out has unit norm and inner products between them are
//! cosine similarities. Index construction and queries must both go through
//! the same `Embedder`, otherwise scores are not comparable.
//!
//! Two models ship with the crate:
//!
//! - [`BertEmbedder`] (feature `bert`): a BERT sentence encoder loaded from a
//!   local directory, mean-pooled over the attention mask.
//! - [`HashingEmbedder`]: a deterministic feature-hashing bag of words. It has
//!   no semantic understanding and exists for tests and offline runs.

#[cfg(feature = "bert")]
mod bert;
mod error;
mod hashing;

use std::sync::Arc;

#[cfg(feature = "bert")]
pub use bert::BertEmbedder;
pub use error::{EmbeddingError, Result};
pub use hashing::HashingEmbedder;

/// Default embedding dimension (all-MiniLM-L6-v2).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Maximum sequence length fed to transformer models.
pub const MAX_SEQUENCE_LENGTH: usize = 512;

/// A model that maps text to a raw, un-normalized vector.
pub trait EmbeddingModel: Send + Sync {
    /// Encode a single text. The returned vector must have `dimension()` entries.
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Output dimension of this model.
    fn dimension(&self) -> usize;

    /// Human-readable model name for logging and the catalog endpoint.
    fn name(&self) -> &str;
}

/// An L2-normalized embedding.
///
/// Unit norm, except when the raw vector had zero norm: then it is kept as-is
/// (divided by 1) and will score 0 against everything.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    /// Normalize a raw model output.
    pub fn normalized(raw: Vec<f32>) -> Self {
        Self(l2_normalize(raw))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f32 {
        euclidean_norm(&self.0)
    }

    /// Inner product with another slice of the same length.
    pub fn dot(&self, other: &[f32]) -> f32 {
        dot(&self.0, other)
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn euclidean_norm(values: &[f32]) -> f32 {
    values.iter().map(|v| v * v).sum::<f32>().sqrt()
}

/// Divide by the Euclidean norm, or by 1 when the norm is zero.
pub fn l2_normalize(mut values: Vec<f32>) -> Vec<f32> {
    let norm = euclidean_norm(&values);
    let divisor = if norm == 0.0 { 1.0 } else { norm };
    values.iter_mut().for_each(|v| *v /= divisor);
    values
}

/// Normalizing front-end over an [`EmbeddingModel`].
///
/// Cheap to clone; the model is shared.
#[derive(Clone)]
pub struct Embedder {
    model: Arc<dyn EmbeddingModel>,
    dimension: usize,
}

impl Embedder {
    /// Wrap a model. Its dimension is read once here and reused for every
    /// vector and index built through this embedder.
    pub fn new(model: Arc<dyn EmbeddingModel>) -> Self {
        let dimension = model.dimension();
        tracing::info!(model = model.name(), dimension, "Embedder initialized");
        Self { model, dimension }
    }

    /// Embed one text into a normalized vector.
    pub fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        let raw = self.model.encode(text)?;
        if raw.len() != self.dimension {
            return Err(EmbeddingError::UnexpectedDimension {
                expected: self.dimension,
                actual: raw.len(),
            });
        }
        Ok(EmbeddingVector::normalized(raw))
    }

    /// Embed texts in order, failing on the first error.
    pub fn embed_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<EmbeddingVector>> {
        texts.iter().map(|text| self.embed(text.as_ref())).collect()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }
}
