use serde::Deserialize;
use std::path::PathBuf;

use crate::embedding::DEFAULT_EMBEDDING_DIM;
use crate::services::DEFAULT_TOP_K;

/// Which embedding model to run
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// BERT sentence encoder loaded from `model_dir`
    Bert,
    /// Feature-hashing bag of words; no model files needed
    Hashing,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Per-request timeout for TMDB calls, in seconds
    #[serde(default = "default_tmdb_timeout_secs")]
    pub tmdb_timeout_secs: u64,

    /// JSON file holding the movie catalog
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Embedding model backend
    #[serde(default = "default_embedding_backend")]
    pub embedding_backend: EmbeddingBackend,

    /// Directory with config.json, tokenizer.json and model.safetensors
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// Vector dimension for the hashing backend
    #[serde(default = "default_hashing_dim")]
    pub hashing_dim: usize,

    /// Number of recommendations per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Redis connection URL; caching is disabled when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_timeout_secs() -> u64 {
    10
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/movies.json")
}

fn default_embedding_backend() -> EmbeddingBackend {
    EmbeddingBackend::Bert
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("models/all-MiniLM-L6-v2")
}

fn default_hashing_dim() -> usize {
    DEFAULT_EMBEDDING_DIM
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.tmdb_api_key.trim().is_empty() {
            anyhow::bail!("TMDB_API_KEY must not be empty");
        }
        if self.top_k == 0 {
            anyhow::bail!("TOP_K must be at least 1");
        }
        if self.tmdb_timeout_secs == 0 {
            anyhow::bail!("TMDB_TIMEOUT_SECS must be at least 1");
        }
        if self.embedding_backend == EmbeddingBackend::Hashing && self.hashing_dim == 0 {
            anyhow::bail!("HASHING_DIM must be at least 1");
        }
        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
