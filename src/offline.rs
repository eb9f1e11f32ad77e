//! Offline asset cache: a precaching, network-first worker in front of the
//! static asset origin.
//!
//! The worker moves through `Installing -> Activating -> Active`. Install
//! precaches the asset list into one named cache and skips the waiting phase;
//! activation drops every cache with another name. Once active, every fetch
//! goes to the network first and falls back to the cache when that fails.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request},
};
use std::{collections::BTreeMap, path::PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

/// Bump to invalidate caches left behind by older builds.
pub const CACHE_NAME: &str = "habit-tracker-v1";

pub const PRECACHE_ASSETS: [&str; 3] = ["/manifest.json", "/custom.css", "/favicon.svg"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn ok(content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            content_type: "text/plain; charset=utf-8".to_string(),
            body: b"not found".to_vec(),
        }
    }
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("network unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("offline and '{0}' is not cached")]
    Offline(String),
    #[error(transparent)]
    Network(#[from] NetworkError),
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("worker is {0:?}, not installing")]
    WrongState(WorkerState),
    #[error("precaching '{path}' answered {status}")]
    BadStatus { path: String, status: u16 },
    #[error("precaching '{path}' failed: {source}")]
    Network {
        path: String,
        #[source]
        source: NetworkError,
    },
}

/// The origin behind the cache. Requests always bypass any HTTP cache.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<AssetResponse, NetworkError>;
}

/// Named caches of request path to response.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    async fn keys(&self) -> Vec<String>;

    async fn delete(&self, cache_name: &str) -> bool;

    async fn put(&self, cache_name: &str, path: &str, response: AssetResponse);

    /// First match for `path` across all caches.
    async fn match_request(&self, path: &str) -> Option<AssetResponse>;

    async fn contains(&self, cache_name: &str, path: &str) -> bool;
}

#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    caches: Mutex<BTreeMap<String, BTreeMap<String, AssetResponse>>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn keys(&self) -> Vec<String> {
        self.caches.lock().await.keys().cloned().collect()
    }

    async fn delete(&self, cache_name: &str) -> bool {
        self.caches.lock().await.remove(cache_name).is_some()
    }

    async fn put(&self, cache_name: &str, path: &str, response: AssetResponse) {
        self.caches
            .lock()
            .await
            .entry(cache_name.to_string())
            .or_default()
            .insert(path.to_string(), response);
    }

    async fn match_request(&self, path: &str) -> Option<AssetResponse> {
        self.caches
            .lock()
            .await
            .values()
            .find_map(|cache| cache.get(path).cloned())
    }

    async fn contains(&self, cache_name: &str, path: &str) -> bool {
        self.caches
            .lock()
            .await
            .get(cache_name)
            .is_some_and(|cache| cache.contains_key(path))
    }
}

/// Serves files from the static asset directory through `ServeDir`.
#[derive(Debug, Clone)]
pub struct StaticOrigin {
    root: PathBuf,
}

impl StaticOrigin {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Network for StaticOrigin {
    async fn fetch(&self, path: &str) -> Result<AssetResponse, NetworkError> {
        let Ok(request) = Request::builder().uri(path).body(Body::empty()) else {
            return Ok(AssetResponse::not_found());
        };
        let response = match ServeDir::new(&self.root).oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        let status = response.status();
        if status.is_server_error() {
            return Err(NetworkError::Unavailable(format!("origin answered {status}")));
        }
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = to_bytes(Body::new(response.into_body()), usize::MAX)
            .await
            .map_err(|err| NetworkError::Unavailable(err.to_string()))?;

        Ok(AssetResponse {
            status: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    Activating,
    Active,
    /// Install failed; the worker never controls requests.
    Redundant,
}

pub struct CacheWorker<N, C> {
    cache_name: String,
    assets: Vec<String>,
    network: N,
    caches: C,
    state: Mutex<WorkerState>,
    claimed: Mutex<bool>,
}

impl<N: Network, C: CacheStorage> CacheWorker<N, C> {
    pub fn new<I, S>(cache_name: impl Into<String>, assets: I, network: N, caches: C) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cache_name: cache_name.into(),
            assets: assets.into_iter().map(Into::into).collect(),
            network,
            caches,
            state: Mutex::new(WorkerState::Installing),
            claimed: Mutex::new(false),
        }
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.lock().await
    }

    pub async fn has_claimed_clients(&self) -> bool {
        *self.claimed.lock().await
    }

    pub fn caches(&self) -> &C {
        &self.caches
    }

    /// Precaches every asset. All assets must answer 200 or nothing is stored.
    /// On success the worker skips waiting and moves to `Activating`.
    pub async fn install(&self) -> Result<(), InstallError> {
        let mut state = self.state.lock().await;
        if *state != WorkerState::Installing {
            return Err(InstallError::WrongState(*state));
        }

        let mut fetched = Vec::with_capacity(self.assets.len());
        for path in &self.assets {
            let response = match self.network.fetch(path).await {
                Ok(response) => response,
                Err(source) => {
                    *state = WorkerState::Redundant;
                    return Err(InstallError::Network {
                        path: path.clone(),
                        source,
                    });
                }
            };
            if response.status != 200 {
                *state = WorkerState::Redundant;
                return Err(InstallError::BadStatus {
                    path: path.clone(),
                    status: response.status,
                });
            }
            fetched.push((path, response));
        }

        for (path, response) in fetched {
            self.caches.put(&self.cache_name, path, response).await;
        }

        info!(cache = %self.cache_name, assets = self.assets.len(), "precache complete");
        *state = WorkerState::Activating;
        Ok(())
    }

    /// Drops every other cache and claims open clients. Safe to repeat.
    pub async fn activate(&self) {
        let mut state = self.state.lock().await;
        match *state {
            WorkerState::Activating | WorkerState::Active => {}
            other => {
                warn!(state = ?other, "ignoring activation");
                return;
            }
        }

        for key in self.caches.keys().await {
            if key != self.cache_name && self.caches.delete(&key).await {
                info!(cache = %key, "deleted stale cache");
            }
        }

        *self.claimed.lock().await = true;
        *state = WorkerState::Active;
    }

    /// Network first; a 200 is stored before it is returned. When the network
    /// fails the cached copy is served, if any.
    pub async fn fetch(&self, path: &str) -> Result<AssetResponse, FetchError> {
        if self.state().await != WorkerState::Active {
            return Ok(self.network.fetch(path).await?);
        }

        match self.network.fetch(path).await {
            Ok(response) => {
                if response.status == 200 {
                    self.caches
                        .put(&self.cache_name, path, response.clone())
                        .await;
                }
                Ok(response)
            }
            Err(err) => {
                debug!(path, "network failed, trying cache: {err}");
                self.caches
                    .match_request(path)
                    .await
                    .ok_or_else(|| FetchError::Offline(path.to_string()))
            }
        }
    }
}
