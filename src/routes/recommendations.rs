use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::RecommendationResponse,
    routes::AppState,
    services::recommendations,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// Movie name as selected by the user
    pub title: String,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        title = %request.title,
        "Processing recommendation request"
    );

    let response = recommendations::recommend_for_title(
        state.service.clone(),
        state.provider.clone(),
        &request.title,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        results = response.recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(response))
}
