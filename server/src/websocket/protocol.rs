//! Notification messages pushed to WebSocket subscribers.
//!
//! All messages are JSON-encoded and use camelCase for field names.

use quotebook_engine::Timestamp;
use serde::{Deserialize, Serialize};

/// How long a client should keep a notification on screen.
pub const NOTIFICATION_TTL_MS: Timestamp = 5000;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A transient, auto-dismissing user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,
    /// Human-readable text
    pub message: String,
    /// When it was raised (milliseconds since epoch)
    pub at: Timestamp,
    /// When clients should dismiss it
    pub expires_at: Timestamp,
}

impl Notification {
    /// Create a notification raised at `at`.
    pub fn new(level: NotificationLevel, message: impl Into<String>, at: Timestamp) -> Self {
        Self {
            level,
            message: message.into(),
            at,
            expires_at: at + NOTIFICATION_TTL_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_serialization() {
        let msg = Notification::new(NotificationLevel::Success, "Sync completed", 1000);
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"level":"success","message":"Sync completed","at":1000,"expiresAt":6000}"#
        );
    }

    #[test]
    fn test_notification_roundtrip() {
        let msg = Notification::new(NotificationLevel::Error, "Failed", 5);
        let parsed: Notification = serde_json::from_str(&serde_json::to_string(&msg).unwrap()).unwrap();
        assert_eq!(parsed, msg);
    }
}
