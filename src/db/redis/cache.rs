use redis::AsyncCommands;
use redis::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::AppResult;

/// Namespaced keys for cached metadata lookups
///
/// Movie names are trimmed and lowercased so "Heat" and " heat " share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    TitleSearch(String),
    MovieDetails(String),
}

impl CacheKey {
    fn namespace(&self) -> &'static str {
        match self {
            CacheKey::TitleSearch(_) => "search",
            CacheKey::MovieDetails(_) => "movie",
        }
    }

    fn term(&self) -> &str {
        match self {
            CacheKey::TitleSearch(term) | CacheKey::MovieDetails(term) => term,
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace(), self.term().trim().to_lowercase())
    }
}

/// Opens a Redis client; no connection is made until first use
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    Ok(Client::open(redis_url)?)
}

/// A serialized value waiting to be written
struct PendingWrite {
    key: String,
    json: String,
    ttl_secs: u64,
}

/// Drains queued writes into Redis until told to stop
struct CacheWriter {
    client: Client,
    queue: mpsc::UnboundedReceiver<PendingWrite>,
}

impl CacheWriter {
    async fn run(mut self, mut stop: oneshot::Receiver<()>) {
        tracing::info!("Cache writer started");
        let mut detached = false;

        loop {
            tokio::select! {
                next = self.queue.recv() => match next {
                    Some(write) => self.write(write).await,
                    None => break,
                },
                signal = &mut stop, if !detached => {
                    if signal.is_err() {
                        // Handle dropped without shutdown; run until every Cache is gone
                        tracing::debug!("Cache writer handle dropped");
                        detached = true;
                        continue;
                    }

                    self.queue.close();
                    let mut flushed = 0usize;
                    while let Some(write) = self.queue.recv().await {
                        self.write(write).await;
                        flushed += 1;
                    }
                    tracing::info!(flushed, "Cache writer flushed pending writes");
                    break;
                }
            }
        }

        tracing::info!("Cache writer stopped");
    }

    async fn write(&self, write: PendingWrite) {
        if let Err(e) = store(&self.client, &write).await {
            tracing::error!(error = %e, key = %write.key, "Failed to write to Redis cache");
        }
    }
}

async fn store(client: &Client, write: &PendingWrite) -> AppResult<()> {
    let mut conn = client.get_multiplexed_async_connection().await?;
    let _: () = conn
        .set_ex(&write.key, &write.json, write.ttl_secs)
        .await?;
    Ok(())
}

async fn load(client: &Client, key: &CacheKey) -> AppResult<Option<String>> {
    let mut conn = client.get_multiplexed_async_connection().await?;
    Ok(conn.get(key.to_string()).await?)
}

#[derive(Clone)]
struct CacheBackend {
    client: Client,
    queue: mpsc::UnboundedSender<PendingWrite>,
}

/// Read-through cache for metadata lookups, backed by Redis
///
/// A disabled cache always misses and drops writes. Redis read failures are
/// logged and treated as misses so lookups keep working during an outage.
#[derive(Clone)]
pub struct Cache {
    backend: Option<CacheBackend>,
}

/// Stops the background writer once the server is done
#[must_use = "call `shutdown` to flush queued cache writes"]
pub struct CacheWriterHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer and waits until every queued write has been attempted
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task failed");
        }
    }
}

impl Cache {
    /// Creates an enabled cache and spawns its background writer
    pub async fn new(client: Client) -> (Self, CacheWriterHandle) {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel();

        let writer = CacheWriter {
            client: client.clone(),
            queue: queue_rx,
        };
        let task = tokio::spawn(writer.run(stop_rx));

        let cache = Self {
            backend: Some(CacheBackend {
                client,
                queue: queue_tx,
            }),
        };

        (cache, CacheWriterHandle { stop: stop_tx, task })
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Looks up `key`
    ///
    /// Returns `None` on a miss, when the cache is disabled, when Redis is
    /// unreachable, or when the stored value no longer deserializes.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let Some(backend) = &self.backend else {
            return Ok(None);
        };

        let raw = match load(&backend.client, key).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Redis read failed, treating as miss");
                return Ok(None);
            }
        };

        let Some(json) = raw else {
            tracing::debug!(key = %key, "Cache miss");
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(value) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(Some(value))
            }
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Discarding undecodable cache entry");
                Ok(None)
            }
        }
    }

    /// Queues `value` for writing under `key` and returns immediately
    pub fn put_in_background<T: Serialize>(&self, key: &CacheKey, value: &T, ttl_secs: u64) {
        let Some(backend) = &self.backend else {
            return;
        };

        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            json,
            ttl_secs,
        };
        if backend.queue.send(write).is_err() {
            tracing::warn!(key = %key, "Cache writer stopped, dropping write");
        }
    }
}
