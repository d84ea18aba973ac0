use std::collections::BTreeSet;

use crate::{
    error::{AppError, AppResult},
    index::ScoredPosition,
    models::{CatalogEntry, QueryMovie, RecommendationRecord},
};

/// Joins ranked positions back to catalog entries
///
/// Output order equals input order; ranks start at 1. A position outside the
/// catalog means the index and catalog are out of sync and is an error, never
/// skipped.
pub fn assemble(
    query: &QueryMovie,
    result: &[ScoredPosition],
    catalog: &[CatalogEntry],
) -> AppResult<Vec<RecommendationRecord>> {
    result
        .iter()
        .enumerate()
        .map(|(i, scored)| {
            let entry = catalog
                .get(scored.position)
                .ok_or(AppError::IndexOutOfBounds {
                    position: scored.position,
                    len: catalog.len(),
                })?;

            Ok(RecommendationRecord {
                rank: i + 1,
                title: entry.title.clone(),
                summary: entry.summary.clone(),
                genres: entry.genres.iter().cloned().collect(),
                score: scored.score,
                score_percent: score_percent(scored.score),
                shared_genres: shared_genres(&query.genres, entry),
                thumbnail: entry.thumbnail.clone(),
            })
        })
        .collect()
}

/// `score * 100`, rounded to 2 decimal places
pub fn score_percent(score: f32) -> f64 {
    (f64::from(score) * 100.0 * 100.0).round() / 100.0
}

/// Case-sensitive intersection, sorted
pub fn shared_genres(query_genres: &[String], entry: &CatalogEntry) -> Vec<String> {
    let query: BTreeSet<&str> = query_genres.iter().map(String::as_str).collect();
    entry
        .genres
        .iter()
        .filter(|genre| query.contains(genre.as_str()))
        .cloned()
        .collect()
}
