use crate::{
    embedding::Embedder,
    error::AppResult,
    index::{QueryResult, SimilarityIndex},
};

/// Embeds `query_summary` and returns its `k` nearest catalog positions
///
/// The query goes through the same [`Embedder`] the index was built with, so
/// both sides share one normalization rule. Results are ordered by
/// descending score; `k` larger than the index clamps to the index size.
pub fn search(
    embedder: &Embedder,
    index: &SimilarityIndex,
    query_summary: &str,
    k: usize,
) -> AppResult<QueryResult> {
    let query = embedder.embed(query_summary)?;
    if query.norm() == 0.0 {
        tracing::warn!("Query summary embedded to a zero vector; all scores will be 0");
    }

    let result = index.search(&query, k)?;

    tracing::debug!(
        k,
        returned = result.len(),
        top_score = result.first().map(|r| r.score),
        "Similarity search completed"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{embedding::HashingEmbedder, error::AppError};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    const SUMMARIES: [&str; 4] = [
        "A hero saves the world from an alien invasion",
        "A quiet romance unfolds in a small Paris cafe",
        "Detectives chase a serial killer through a rainy city",
        "A family of toys comes alive when nobody is watching",
    ];

    fn setup() -> (Embedder, SimilarityIndex) {
        let embedder = Embedder::new(Arc::new(HashingEmbedder::new(256).unwrap()));
        let vectors = embedder.embed_batch(&SUMMARIES).unwrap();
        let index = SimilarityIndex::build(&vectors, embedder.dimension()).unwrap();
        (embedder, index)
    }

    #[test]
    fn test_self_similarity_ranks_first() {
        let (embedder, index) = setup();

        for (position, summary) in SUMMARIES.iter().enumerate() {
            let result = search(&embedder, &index, summary, 1).unwrap();
            assert_eq!(result[0].position, position);
            assert_relative_eq!(result[0].score, 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_returns_exactly_k_in_descending_order() {
        let (embedder, index) = setup();

        for k in 1..=SUMMARIES.len() {
            let result = search(&embedder, &index, "A hero chases a killer", k).unwrap();
            assert_eq!(result.len(), k);
            assert!(result.windows(2).all(|w| w[0].score >= w[1].score));
            assert!(result.iter().all(|r| r.position < SUMMARIES.len()));
        }
    }

    #[test]
    fn test_k_larger_than_catalog_clamps() {
        let (embedder, index) = setup();
        let result = search(&embedder, &index, "toys", 50).unwrap();
        assert_eq!(result.len(), SUMMARIES.len());
    }

    #[test]
    fn test_zero_k_is_invalid() {
        let (embedder, index) = setup();
        let err = search(&embedder, &index, "toys", 0).unwrap_err();
        assert!(matches!(err, AppError::InvalidK(0)));
    }

    #[test]
    fn test_empty_query_does_not_fail() {
        let (embedder, index) = setup();
        let result = search(&embedder, &index, "", 2).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_scores_are_cosine_bounded() {
        let (embedder, index) = setup();
        let result = search(&embedder, &index, "A quiet hero in a rainy Paris", 4).unwrap();
        assert!(result
            .iter()
            .all(|r| r.score >= -1.0 - 1e-5 && r.score <= 1.0 + 1e-5));
    }
}
