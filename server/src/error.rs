//! Unified error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quotebook_engine::Error as EngineError;
use serde::Serialize;

use crate::remote::RemoteError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            AppError::Engine(e) => match e {
                EngineError::EmptyText | EngineError::EmptyCategory | EngineError::InvalidImport(_) => {
                    tracing::warn!("Rejected input: {}", e);
                    (StatusCode::BAD_REQUEST, e.to_string(), None)
                }
                EngineError::QuoteNotFound(_) => (StatusCode::NOT_FOUND, e.to_string(), None),
                EngineError::Storage(_) | EngineError::Serialization(_) => {
                    tracing::error!("Storage error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Storage error".to_string(),
                        Some(e.to_string()),
                    )
                }
            },
            AppError::Remote(e) => {
                tracing::warn!("Remote error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Remote request failed".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
