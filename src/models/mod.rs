use serde::Deserialize;

mod movie;
mod recommendation;

pub use movie::{CatalogEntry, MovieDetails, MovieSummary};
pub use recommendation::{QueryMovie, RecommendationRecord, RecommendationResponse};

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw response from TMDB `GET /search/movie`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbSearchResult>,
}

/// One hit in a TMDB movie search
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResult {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl From<TmdbSearchResult> for MovieSummary {
    fn from(result: TmdbSearchResult) -> Self {
        // TMDB sends "" for unknown release dates
        let release_date = result.release_date.filter(|d| !d.is_empty());

        MovieSummary {
            id: result.id,
            title: result.title,
            release_date,
        }
    }
}

/// Raw response from TMDB `GET /movie/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: u64,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}
