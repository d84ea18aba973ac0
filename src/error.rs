use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::embedding::EmbeddingError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Cannot build a similarity index from an empty catalog")]
    EmptyCatalog,

    #[error("Dimension mismatch at position {position}: expected {expected}, got {actual}")]
    DimensionMismatch {
        position: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid k: {0} (must be at least 1)")]
    InvalidK(usize),

    #[error("Position {position} is outside a catalog of {len} entries")]
    IndexOutOfBounds { position: usize, len: usize },

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("No summary found for '{0}'.")]
    MissingSynopsis(String),

    #[error("'{0}' is already in our catalog. Please select a different movie.")]
    AlreadyInCatalog(String),

    #[error("No similar movies found in the catalog for '{0}'")]
    NoSimilarItems(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable kind, returned alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Embedding(_) => "embedding_failure",
            AppError::EmptyCatalog => "empty_catalog",
            AppError::DimensionMismatch { .. } => "dimension_mismatch",
            AppError::InvalidK(_) => "invalid_k",
            AppError::IndexOutOfBounds { .. } => "index_out_of_bounds",
            AppError::Cache(_) => "cache",
            AppError::HttpClient(_) | AppError::ExternalApi(_) => "upstream_unavailable",
            AppError::NotFound(_) => "not_found",
            AppError::MissingSynopsis(_) => "missing_synopsis",
            AppError::AlreadyInCatalog(_) => "already_in_catalog",
            AppError::NoSimilarItems(_) => "no_similar_items",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Catalog(_) => "catalog",
            AppError::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) | AppError::InvalidK(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyInCatalog(_) => StatusCode::CONFLICT,
            AppError::MissingSynopsis(_) | AppError::NoSimilarItems(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::ExternalApi(_) | AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            AppError::Embedding(_)
            | AppError::EmptyCatalog
            | AppError::DimensionMismatch { .. }
            | AppError::IndexOutOfBounds { .. }
            | AppError::Cache(_)
            | AppError::Catalog(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
