//! Quotebook Server binary.
//!
//! Loads configuration, opens the quote store, starts the sync poller and
//! serves the HTTP/WebSocket API until interrupted.

use quotebook_engine::{LoadOutcome, QuoteStore};
use quotebook_server::config::Config;
use quotebook_server::poller::spawn_poller;
use quotebook_server::storage::FileStorage;
use quotebook_server::{app, now_millis, AppState};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotebook_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Quotebook Server on {}:{}", config.host, config.port);

    // Open the store
    let storage = FileStorage::open(&config.data_dir)?;
    let store = QuoteStore::open(Box::new(storage), now_millis());
    match store.load_outcome() {
        LoadOutcome::Stored => {
            tracing::info!(quotes = store.len(), "Loaded quotes from {}", config.data_dir.display())
        }
        LoadOutcome::Seeded => tracing::info!("No stored quotes, starting from the seed list"),
        LoadOutcome::Recovered(reason) => {
            tracing::warn!(%reason, "Stored quotes unreadable, starting from the seed list")
        }
    }

    let state = AppState::new(config.clone(), store)?;

    // Start periodic sync
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = spawn_poller(state.sync.clone(), config.sync_interval, shutdown_rx);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = poller.await {
        tracing::warn!("Poller task ended abnormally: {}", e);
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl+C received, shutting down");
}
