/// Movie metadata provider abstraction
///
/// The recommendation pipeline only needs two things from the outside world:
/// title suggestions while the user types, and the full details (title,
/// synopsis, genres) of the movie they picked. Retries, rate limits and
/// authentication stay behind this boundary.
use crate::{
    error::AppResult,
    models::{MovieDetails, MovieSummary},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search for movies by name
    ///
    /// Returns hits in provider relevance order.
    async fn search_titles(&self, query: &str) -> AppResult<Vec<MovieSummary>>;

    /// Fetch details for the best match of `name`
    ///
    /// Fails with `NotFound` when the search has no hits and with
    /// `MissingSynopsis` when the match has no overview. Upstream failures
    /// surface as `ExternalApi` or `HttpClient`.
    async fn lookup(&self, name: &str) -> AppResult<MovieDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
