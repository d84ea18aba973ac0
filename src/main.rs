use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use plotmatch_api::{
    catalog::Catalog,
    config::{Config, EmbeddingBackend},
    db::{create_redis_client, Cache},
    embedding::{Embedder, EmbeddingModel, HashingEmbedder},
    routes::{create_router, AppState},
    services::{providers::TmdbProvider, RecommendationService},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("plotmatch_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = Catalog::load(&config.catalog_path).context("Failed to load movie catalog")?;
    let model = load_embedding_model(&config)?;
    let service = RecommendationService::build(catalog, Embedder::new(model), config.top_k)
        .context("Failed to build recommendation index")?;

    let (cache, cache_handle) = match &config.redis_url {
        Some(redis_url) => {
            let (cache, handle) = Cache::new(create_redis_client(redis_url)?).await;
            tracing::info!("Redis lookup cache enabled");
            (cache, Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set, lookup cache disabled");
            (Cache::disabled(), None)
        }
    };

    let provider = TmdbProvider::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        Duration::from_secs(config.tmdb_timeout_secs),
    )?;

    let state = Arc::new(AppState::new(Arc::new(service), Arc::new(provider)));
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}

fn load_embedding_model(config: &Config) -> anyhow::Result<Arc<dyn EmbeddingModel>> {
    match config.embedding_backend {
        EmbeddingBackend::Hashing => {
            tracing::warn!(
                dim = config.hashing_dim,
                "Using the hashing embedder; similarity is lexical, not semantic"
            );
            Ok(Arc::new(HashingEmbedder::new(config.hashing_dim)?))
        }
        #[cfg(feature = "bert")]
        EmbeddingBackend::Bert => Ok(Arc::new(
            plotmatch_api::embedding::BertEmbedder::load(&config.model_dir)
                .context("Failed to load BERT embedding model")?,
        )),
        #[cfg(not(feature = "bert"))]
        EmbeddingBackend::Bert => anyhow::bail!(
            "EMBEDDING_BACKEND=bert requires building with the `bert` feature"
        ),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
