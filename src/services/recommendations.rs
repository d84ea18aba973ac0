use chrono::Utc;
use std::sync::Arc;

use crate::{
    catalog::Catalog,
    embedding::Embedder,
    error::{AppError, AppResult},
    index::SimilarityIndex,
    models::{QueryMovie, RecommendationRecord, RecommendationResponse},
    services::{assembler, providers::MetadataProvider, similarity},
};

/// Number of neighbours returned per query unless configured otherwise
pub const DEFAULT_TOP_K: usize = 2;

/// Embedder, index and catalog, built once at startup
///
/// Read-only after construction and shared across requests behind an `Arc`.
/// Catalog position `i` and index row `i` always describe the same movie.
pub struct RecommendationService {
    embedder: Embedder,
    index: SimilarityIndex,
    catalog: Catalog,
    top_k: usize,
}

impl RecommendationService {
    /// Embeds every catalog summary and builds the similarity index
    pub fn build(catalog: Catalog, embedder: Embedder, top_k: usize) -> AppResult<Self> {
        if top_k == 0 {
            return Err(AppError::InvalidK(top_k));
        }

        tracing::info!(
            entries = catalog.len(),
            model = embedder.model_name(),
            "Embedding catalog"
        );

        let vectors = embedder.embed_batch(&catalog.summaries())?;
        let index = SimilarityIndex::build(&vectors, embedder.dimension())?;

        Ok(Self {
            embedder,
            index,
            catalog,
            top_k,
        })
    }

    /// Top-K catalog movies whose summaries are closest to the query's
    pub fn recommend(&self, query: &QueryMovie) -> AppResult<Vec<RecommendationRecord>> {
        if query.summary.trim().is_empty() {
            return Err(AppError::MissingSynopsis(query.title.clone()));
        }

        let result = similarity::search(&self.embedder, &self.index, &query.summary, self.top_k)?;
        if result.is_empty() {
            return Err(AppError::NoSimilarItems(query.title.clone()));
        }

        let records = assembler::assemble(query, &result, self.catalog.entries())?;

        tracing::info!(
            title = %query.title,
            results = records.len(),
            top_title = records.first().map(|r| r.title.as_str()),
            top_score = records.first().map(|r| r.score),
            "Recommendations assembled"
        );

        Ok(records)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn embedder(&self) -> &Embedder {
        &self.embedder
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

/// Full pipeline for one user query: lookup → embed → search → assemble
///
/// Lookup failures are returned as-is, before any embedding happens, so a
/// movie missing upstream is never reported as "no similar movies".
pub async fn recommend_for_title(
    service: Arc<RecommendationService>,
    provider: Arc<dyn MetadataProvider>,
    title: &str,
) -> AppResult<RecommendationResponse> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Movie title cannot be empty".to_string()));
    }
    if service.catalog().contains_title(title) {
        return Err(AppError::AlreadyInCatalog(title.to_string()));
    }

    let details = provider.lookup(title).await?;
    if service.catalog().contains_title(&details.title) {
        return Err(AppError::AlreadyInCatalog(details.title));
    }

    tracing::info!(
        requested = %title,
        resolved = %details.title,
        provider = provider.name(),
        "Query movie resolved"
    );

    let query = QueryMovie::from(details);
    let (query, recommendations) = tokio::task::spawn_blocking(move || {
        let records = service.recommend(&query)?;
        Ok::<_, AppError>((query, records))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Recommendation task failed: {}", e)))??;

    Ok(RecommendationResponse {
        query,
        recommendations,
        generated_at: Utc::now(),
    })
}
