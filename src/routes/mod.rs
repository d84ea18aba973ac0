use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{providers::MetadataProvider, RecommendationService},
};

pub mod catalog;
pub mod recommendations;
pub mod titles;

/// Shared state for all handlers
pub struct AppState {
    pub service: Arc<RecommendationService>,
    pub provider: Arc<dyn MetadataProvider>,
}

impl AppState {
    pub fn new(service: Arc<RecommendationService>, provider: Arc<dyn MetadataProvider>) -> Self {
        Self { service, provider }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(cors),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/titles/search", get(titles::search))
        .route("/recommendations", post(recommendations::recommend))
        .route("/catalog", get(catalog::info))
        .route("/catalog/thumbnails", get(catalog::thumbnails))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
