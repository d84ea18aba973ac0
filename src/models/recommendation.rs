use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MovieDetails;

/// One recommended catalog movie, built per query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationRecord {
    /// 1-based rank
    pub rank: usize,
    pub title: String,
    pub summary: String,
    pub genres: Vec<String>,
    /// Cosine similarity in [-1, 1]
    pub score: f32,
    /// `score * 100`, rounded to 2 decimal places
    pub score_percent: f64,
    /// Genres shared with the queried movie, sorted
    pub shared_genres: Vec<String>,
    pub thumbnail: Option<String>,
}

/// The queried movie as echoed back to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryMovie {
    pub title: String,
    pub summary: String,
    pub genres: Vec<String>,
}

impl From<MovieDetails> for QueryMovie {
    fn from(details: MovieDetails) -> Self {
        Self {
            title: details.title,
            summary: details.summary,
            genres: details.genres,
        }
    }
}

/// Response for a recommendation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub query: QueryMovie,
    pub recommendations: Vec<RecommendationRecord>,
    pub generated_at: DateTime<Utc>,
}
