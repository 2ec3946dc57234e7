//! Quotebook Server - local quote service with periodic remote sync.
//!
//! The server owns a [`QuoteStore`] persisted to a data directory, exposes
//! it over a small JSON API, and keeps it in step with a remote post
//! collection through a background poller. Transient notifications about
//! syncs, imports and failed requests are pushed to WebSocket subscribers.

pub mod config;
pub mod error;
pub mod handlers;
pub mod poller;
pub mod remote;
pub mod routes;
pub mod storage;
pub mod sync;
pub mod websocket;

use crate::config::Config;
use crate::remote::{RemoteClient, RemoteError};
use crate::sync::SyncService;
use crate::websocket::ConnectionManager;
use axum::Router;
use quotebook_engine::{QuoteStore, Timestamp};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// The store, shared between request handlers and the poller.
pub type SharedStore = Arc<Mutex<QuoteStore>>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub remote: Arc<RemoteClient>,
    pub sync: Arc<SyncService>,
    pub config: Arc<Config>,
    pub conn_manager: Arc<ConnectionManager>,
}

impl AppState {
    /// Build state with a remote client configured from `config`.
    pub fn new(config: Config, store: QuoteStore) -> Result<Self, RemoteError> {
        let remote = RemoteClient::new(&config.remote_url, config.request_timeout)?;
        Ok(Self::with_remote(config, store, remote))
    }

    /// Build state around an existing remote client.
    pub fn with_remote(config: Config, store: QuoteStore, remote: RemoteClient) -> Self {
        let store = Arc::new(Mutex::new(store));
        let remote = Arc::new(remote);
        let conn_manager = ConnectionManager::new_shared();
        let sync = Arc::new(SyncService::new(
            store.clone(),
            remote.clone(),
            Arc::new(config.merge_strategy),
            conn_manager.clone(),
        ));

        Self {
            store,
            remote,
            sync,
            config: Arc::new(config),
            conn_manager,
        }
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Current wall-clock time in milliseconds since the epoch.
pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis().max(0) as Timestamp
}
