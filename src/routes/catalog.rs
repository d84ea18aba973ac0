use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogInfo {
    pub entries: usize,
    pub embedding_model: String,
    pub dimension: usize,
    pub top_k: usize,
}

/// Catalog size and the embedding setup behind it
pub async fn info(State(state): State<Arc<AppState>>) -> Json<CatalogInfo> {
    let service = &state.service;
    Json(CatalogInfo {
        entries: service.catalog().len(),
        embedding_model: service.embedder().model_name().to_string(),
        dimension: service.index().dim(),
        top_k: service.top_k(),
    })
}

/// Thumbnail URLs for the front-end marquee
pub async fn thumbnails(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(
        state
            .service
            .catalog()
            .thumbnails()
            .into_iter()
            .map(str::to_string)
            .collect(),
    )
}
