//! Sync and notification routes.

use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
    routing::{get, post},
    Json, Router,
};

use crate::handlers::handle_websocket_connection;
use crate::sync::{SyncOutcome, SyncStatus};
use crate::AppState;

/// Create sync routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sync", post(sync_handler))
        .route("/sync/status", get(status_handler))
        .route("/notifications", get(notifications_handler))
}

/// POST /sync - Run a sync cycle now.
async fn sync_handler(State(state): State<AppState>) -> Json<SyncOutcome> {
    Json(state.sync.sync().await)
}

/// GET /sync/status - Whether a cycle is running and when the last one merged.
async fn status_handler(State(state): State<AppState>) -> Json<SyncStatus> {
    Json(state.sync.status().await)
}

/// GET /notifications - Subscribe to notifications over WebSocket.
async fn notifications_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let conn_manager = state.conn_manager.clone();
    ws.on_upgrade(move |socket| handle_websocket_connection(socket, conn_manager))
}
