//! Exact flat inner-product index over catalog embeddings.
//!
//! Vectors are stored row-major in one contiguous buffer. Search scores every
//! row, so recall is exact; catalogs are expected to be tens to low thousands
//! of entries. Inputs are unit vectors, so inner product equals cosine
//! similarity.

use std::cmp::Ordering;

use crate::{
    embedding::EmbeddingVector,
    error::{AppError, AppResult},
};

/// A scored neighbour: position in the catalog and cosine similarity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPosition {
    pub position: usize,
    pub score: f32,
}

/// Ranked neighbours, highest score first
pub type QueryResult = Vec<ScoredPosition>;

/// Immutable snapshot of all catalog vectors
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    dim: usize,
    len: usize,
    data: Vec<f32>,
}

impl SimilarityIndex {
    /// Builds the index from the full embedding batch.
    ///
    /// Positions follow the order of `vectors`.
    pub fn build(vectors: &[EmbeddingVector], dim: usize) -> AppResult<Self> {
        if vectors.is_empty() {
            return Err(AppError::EmptyCatalog);
        }
        if dim == 0 {
            return Err(AppError::DimensionMismatch {
                position: 0,
                expected: dim,
                actual: vectors[0].len(),
            });
        }

        let mut data = Vec::with_capacity(vectors.len() * dim);
        for (position, vector) in vectors.iter().enumerate() {
            if vector.len() != dim {
                return Err(AppError::DimensionMismatch {
                    position,
                    expected: dim,
                    actual: vector.len(),
                });
            }
            data.extend_from_slice(vector.as_slice());
        }

        tracing::info!(vectors = vectors.len(), dim, "Similarity index built");

        Ok(Self {
            dim,
            len: vectors.len(),
            data,
        })
    }

    /// Top-`k` rows by inner product with `query`.
    ///
    /// Returns `min(k, len)` results. Ties keep insertion order, lower
    /// position first.
    pub fn search(&self, query: &EmbeddingVector, k: usize) -> AppResult<QueryResult> {
        if k == 0 {
            return Err(AppError::InvalidK(k));
        }
        if query.len() != self.dim {
            return Err(AppError::DimensionMismatch {
                position: 0,
                expected: self.dim,
                actual: query.len(),
            });
        }

        let mut scored: Vec<ScoredPosition> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(position, row)| ScoredPosition {
                position,
                score: positive_zero(query.dot(row)),
            })
            .collect();

        // sort_by is stable, so equal scores stay in position order
        scored.sort_by(|a, b| descending(a.score, b.score));
        scored.truncate(k.min(self.len));

        Ok(scored)
    }

    /// Number of indexed vectors
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

fn descending(a: f32, b: f32) -> Ordering {
    b.total_cmp(&a)
}

// total_cmp orders -0.0 below 0.0; fold them so they tie
fn positive_zero(score: f32) -> f32 {
    if score == 0.0 {
        0.0
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit(raw: &[f32]) -> EmbeddingVector {
        EmbeddingVector::normalized(raw.to_vec())
    }

    fn sample_index() -> SimilarityIndex {
        let vectors = vec![
            unit(&[1.0, 0.0, 0.0]),
            unit(&[0.0, 1.0, 0.0]),
            unit(&[1.0, 1.0, 0.0]),
            unit(&[0.0, 0.0, 1.0]),
        ];
        SimilarityIndex::build(&vectors, 3).unwrap()
    }

    #[test]
    fn test_build_empty_is_empty_catalog() {
        let err = SimilarityIndex::build(&[], 3).unwrap_err();
        assert!(matches!(err, AppError::EmptyCatalog));
    }

    #[test]
    fn test_build_rejects_wrong_dimension() {
        let vectors = vec![unit(&[1.0, 0.0]), unit(&[1.0, 0.0, 0.0])];
        let err = SimilarityIndex::build(&vectors, 2).unwrap_err();
        assert!(matches!(
            err,
            AppError::DimensionMismatch {
                position: 1,
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_build_rejects_zero_dimension() {
        let vectors = vec![unit(&[1.0])];
        assert!(SimilarityIndex::build(&vectors, 0).is_err());
    }

    #[test]
    fn test_search_returns_k_descending() {
        let index = sample_index();
        let result = index.search(&unit(&[1.0, 0.2, 0.0]), 3).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].position, 0);
        assert_eq!(result[1].position, 2);
        assert_eq!(result[2].position, 1);
        assert!(result.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(result.iter().all(|r| r.position < index.len()));
    }

    #[test]
    fn test_search_clamps_k_to_len() {
        let index = sample_index();
        let result = index.search(&unit(&[0.0, 0.0, 1.0]), 10).unwrap();

        assert_eq!(result.len(), 4);
        let mut positions: Vec<usize> = result.iter().map(|r| r.position).collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_search_zero_k_is_invalid() {
        let index = sample_index();
        let err = index.search(&unit(&[1.0, 0.0, 0.0]), 0).unwrap_err();
        assert!(matches!(err, AppError::InvalidK(0)));
    }

    #[test]
    fn test_search_rejects_query_dimension() {
        let index = sample_index();
        let err = index.search(&unit(&[1.0, 0.0]), 1).unwrap_err();
        assert!(matches!(err, AppError::DimensionMismatch { expected: 3, actual: 2, .. }));
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let vectors = vec![
            unit(&[0.0, 1.0]),
            unit(&[1.0, 0.0]),
            unit(&[1.0, 0.0]),
            unit(&[1.0, 0.0]),
        ];
        let index = SimilarityIndex::build(&vectors, 2).unwrap();
        let result = index.search(&unit(&[1.0, 0.0]), 3).unwrap();

        let positions: Vec<usize> = result.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_self_similarity_scores_one() {
        let index = sample_index();
        let result = index.search(&unit(&[1.0, 1.0, 0.0]), 1).unwrap();
        assert_eq!(result[0].position, 2);
        assert_relative_eq!(result[0].score, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_query_scores_zero_everywhere() {
        let index = sample_index();
        let result = index.search(&unit(&[0.0, 0.0, 0.0]), 4).unwrap();

        assert!(result.iter().all(|r| r.score == 0.0));
        let positions: Vec<usize> = result.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }
}
