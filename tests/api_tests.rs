use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use plotmatch_api::{
    catalog::Catalog,
    embedding::{Embedder, HashingEmbedder},
    error::{AppError, AppResult},
    models::{CatalogEntry, MovieDetails, MovieSummary},
    routes::{create_router, AppState},
    services::{providers::MetadataProvider, RecommendationService},
};

/// In-memory metadata provider; `down` simulates an upstream outage
struct StubProvider {
    movies: Vec<MovieDetails>,
    down: bool,
}

#[async_trait::async_trait]
impl MetadataProvider for StubProvider {
    async fn search_titles(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        if self.down {
            return Err(AppError::ExternalApi(
                "Error connecting to TMDB API (status 503 Service Unavailable)".to_string(),
            ));
        }
        let needle = query.to_lowercase();
        Ok(self
            .movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .map(|m| MovieSummary {
                id: m.id,
                title: m.title.clone(),
                release_date: None,
            })
            .collect())
    }

    async fn lookup(&self, name: &str) -> AppResult<MovieDetails> {
        let hit = self
            .search_titles(name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Movie '{}' not found on TMDB.", name)))?;

        self.movies
            .iter()
            .find(|m| m.id == hit.id)
            .cloned()
            .ok_or_else(|| AppError::Internal("stub out of sync".to_string()))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn upstream_movies() -> Vec<MovieDetails> {
    vec![
        MovieDetails {
            id: 10,
            title: "Hero Returns".to_string(),
            summary: "A hero saves the world".to_string(),
            genres: vec!["Action".to_string(), "Adventure".to_string()],
        },
        MovieDetails {
            id: 11,
            title: "Hero Returns".to_string(),
            summary: "A hero saves the world again".to_string(),
            genres: vec!["Action".to_string()],
        },
        MovieDetails {
            id: 12,
            title: "Lost Reel".to_string(),
            summary: "".to_string(),
            genres: vec![],
        },
    ]
}

fn catalog() -> Catalog {
    let mut first = CatalogEntry::new("A", "A hero saves the world", ["Action"]);
    first.thumbnail = Some("https://image.tmdb.org/t/p/w200/a.jpg".to_string());
    Catalog::from_entries(vec![
        first,
        CatalogEntry::new("B", "A quiet romance unfolds", ["Romance"]),
    ])
    .unwrap()
}

fn create_test_server_with(down: bool) -> TestServer {
    let embedder = Embedder::new(Arc::new(HashingEmbedder::new(128).unwrap()));
    let service = RecommendationService::build(catalog(), embedder, 2).unwrap();
    let provider = StubProvider {
        movies: upstream_movies(),
        down,
    };

    let state = Arc::new(AppState::new(Arc::new(service), Arc::new(provider)));
    TestServer::new(create_router(state)).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(false)
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let response = server.get("/health").await;
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn test_recommendations_two_movie_scenario() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Hero Returns" }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["query"]["title"], "Hero Returns");

    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);

    assert_eq!(recs[0]["rank"], 1);
    assert_eq!(recs[0]["title"], "A");
    assert!((recs[0]["score"].as_f64().unwrap() - 1.0).abs() < 1e-4);
    assert_eq!(recs[0]["score_percent"], 100.0);
    assert_eq!(recs[0]["shared_genres"], json!(["Action"]));
    assert_eq!(recs[0]["thumbnail"], "https://image.tmdb.org/t/p/w200/a.jpg");

    assert_eq!(recs[1]["rank"], 2);
    assert_eq!(recs[1]["title"], "B");
    assert!(recs[1]["score"].as_f64().unwrap() < 1.0);
    assert_eq!(recs[1]["shared_genres"], json!([]));
}

#[tokio::test]
async fn test_recommendations_not_found_upstream() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Zzzqqq123" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["error"], "Movie 'Zzzqqq123' not found on TMDB.");
}

#[tokio::test]
async fn test_recommendations_missing_synopsis() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Lost Reel" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "missing_synopsis");
}

#[tokio::test]
async fn test_recommendations_title_already_in_catalog() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "b" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "already_in_catalog");
}

#[tokio::test]
async fn test_recommendations_upstream_down() {
    let server = create_test_server_with(true);

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Hero Returns" }))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "upstream_unavailable");
}

#[tokio::test]
async fn test_recommendations_empty_title() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "   " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_title_suggestions_deduplicated() {
    let server = create_test_server();

    let response = server.get("/api/v1/titles/search?q=hero").await;
    response.assert_status_ok();

    let suggestions: Vec<String> = response.json();
    assert_eq!(suggestions, vec!["Hero Returns"]);
}

#[tokio::test]
async fn test_title_suggestions_short_query() {
    let server = create_test_server_with(true);

    // Short queries never reach the provider, so an outage is invisible here
    let response = server.get("/api/v1/titles/search?q=he").await;
    response.assert_status_ok();

    let suggestions: Vec<String> = response.json();
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn test_catalog_info_and_thumbnails() {
    let server = create_test_server();

    let response = server.get("/api/v1/catalog").await;
    response.assert_status_ok();
    let info: serde_json::Value = response.json();
    assert_eq!(info["entries"], 2);
    assert_eq!(info["dimension"], 128);
    assert_eq!(info["top_k"], 2);
    assert_eq!(info["embedding_model"], "feature-hashing");

    let response = server.get("/api/v1/catalog/thumbnails").await;
    response.assert_status_ok();
    let thumbnails: Vec<String> = response.json();
    assert_eq!(thumbnails, vec!["https://image.tmdb.org/t/p/w200/a.jpg"]);
}
