/// TMDB (The Movie Database) v3 provider
///
/// API Flow:
/// 1. Title Search: /search/movie?query= → TMDB ID + title
/// 2. Details: /movie/{id} → overview + genres
///
/// `lookup` takes the first search hit, so it resolves the same movie a user
/// would see at the top of the suggestion list.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieDetails, MovieSummary, TmdbMovieDetails, TmdbSearchResponse},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 604800; // 1 week

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl TmdbProvider {
    /// Creates a TMDB provider whose requests time out after `timeout`
    pub fn new(cache: Cache, api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    /// Fetches raw details for a TMDB movie ID
    async fn fetch_details(&self, movie_id: u64) -> AppResult<TmdbMovieDetails> {
        let url = format!("{}/movie/{}", self.api_url, movie_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                movie_id,
                status = %status,
                body = %body,
                "TMDB details request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "Error fetching movie details from TMDB (status {})",
                status
            )));
        }

        Ok(response.json().await?)
    }
}

/// Combines the search hit's title with the details' overview and genres
fn into_movie_details(title: String, details: TmdbMovieDetails) -> AppResult<MovieDetails> {
    let summary = details
        .overview
        .filter(|overview| !overview.trim().is_empty())
        .ok_or_else(|| AppError::MissingSynopsis(title.clone()))?;

    Ok(MovieDetails {
        id: details.id,
        title,
        summary,
        genres: details.genres.into_iter().map(|g| g.name).collect(),
    })
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_titles(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::TitleSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let url = format!("{}/search/movie", self.api_url);

                let response = self
                    .http_client
                    .get(&url)
                    .query(&[("api_key", self.api_key.as_str()), ("query", query)])
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    tracing::error!(
                        query = %query,
                        status = %status,
                        body = %body,
                        "TMDB search request failed"
                    );
                    return Err(AppError::ExternalApi(format!(
                        "Error connecting to TMDB API (status {})",
                        status
                    )));
                }

                let search: TmdbSearchResponse = response.json().await?;
                let titles: Vec<MovieSummary> =
                    search.results.into_iter().map(MovieSummary::from).collect();

                tracing::info!(
                    query = %query,
                    results = titles.len(),
                    provider = "tmdb",
                    "Title search completed"
                );

                Ok(titles)
            }
        )
    }

    async fn lookup(&self, name: &str) -> AppResult<MovieDetails> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(name.to_string()),
            DETAILS_CACHE_TTL,
            async move {
                let hits = self.search_titles(name).await?;
                let best = hits.into_iter().next().ok_or_else(|| {
                    AppError::NotFound(format!("Movie '{}' not found on TMDB.", name))
                })?;

                let details = self.fetch_details(best.id).await?;
                let movie = into_movie_details(best.title, details)?;

                tracing::info!(
                    name = %name,
                    movie_id = movie.id,
                    title = %movie.title,
                    genres = movie.genres.len(),
                    provider = "tmdb",
                    "Movie details fetched"
                );

                Ok::<_, AppError>(movie)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
