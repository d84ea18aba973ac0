use std::collections::HashSet;
use std::sync::Arc;

use crate::{error::AppResult, services::providers::MetadataProvider};

/// Queries shorter than this return no suggestions
pub const MIN_SUGGESTION_QUERY_LEN: usize = 3;

/// Title suggestions for autocomplete
///
/// Delegates to the configured MetadataProvider. Titles are de-duplicated,
/// keeping the provider's relevance order.
pub async fn suggest_titles(
    provider: Arc<dyn MetadataProvider>,
    query: &str,
) -> AppResult<Vec<String>> {
    let query = query.trim();
    if query.chars().count() < MIN_SUGGESTION_QUERY_LEN {
        return Ok(vec![]);
    }

    let hits = provider.search_titles(query).await?;

    let mut seen = HashSet::new();
    let suggestions = hits
        .into_iter()
        .map(|hit| hit.title)
        .filter(|title| seen.insert(title.clone()))
        .collect();

    Ok(suggestions)
}
