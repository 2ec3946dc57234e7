//! WebSocket connection manager.
//!
//! Tracks notification subscribers and fans transient notifications out to
//! all of them. Nothing is retained: a client connecting later does not see
//! earlier messages.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

use super::{Notification, NotificationLevel};
use crate::now_millis;

/// Sender for WebSocket messages.
pub type MessageSender = mpsc::UnboundedSender<Notification>;

/// A single WebSocket connection.
#[derive(Debug)]
pub struct Connection {
    /// Unique identifier for this connection
    pub id: String,
    /// Channel to send messages to this connection
    pub sender: MessageSender,
}

/// Manages active WebSocket connections.
///
/// Thread-safe and can be shared across handlers via `Arc`.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    /// All active connections, keyed by connection ID.
    connections: DashMap<String, Connection>,
}

impl ConnectionManager {
    /// Create a new connection manager.
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection.
    ///
    /// Returns the connection ID.
    pub fn register(&self, sender: MessageSender) -> String {
        let conn_id = uuid::Uuid::new_v4().to_string();

        let connection = Connection {
            id: conn_id.clone(),
            sender,
        };
        self.connections.insert(conn_id.clone(), connection);

        tracing::info!(conn_id = %conn_id, "Notification subscriber registered");

        conn_id
    }

    /// Unregister a connection.
    pub fn unregister(&self, conn_id: &str) {
        if self.connections.remove(conn_id).is_some() {
            tracing::info!(conn_id = %conn_id, "Notification subscriber unregistered");
        }
    }

    /// Broadcast a notification to all connections.
    ///
    /// Returns the number of connections that received the message.
    /// Connections whose receiver is gone are dropped.
    pub fn broadcast(&self, notification: Notification) -> usize {
        let mut sent_count = 0;
        let mut dead = Vec::new();

        for entry in self.connections.iter() {
            if entry.value().sender.send(notification.clone()).is_ok() {
                sent_count += 1;
            } else {
                dead.push(entry.key().clone());
            }
        }

        // Removing while iterating would deadlock on the shard lock
        for conn_id in dead {
            self.unregister(&conn_id);
        }

        tracing::debug!(
            level = ?notification.level,
            recipients = sent_count,
            "{}",
            notification.message
        );

        sent_count
    }

    /// Raise a notification stamped with the current time.
    pub fn notify(&self, level: NotificationLevel, message: impl Into<String>) -> usize {
        self.broadcast(Notification::new(level, message, now_millis()))
    }

    /// Raise an informational notification.
    pub fn info(&self, message: impl Into<String>) -> usize {
        self.notify(NotificationLevel::Info, message)
    }

    /// Raise a success notification.
    pub fn success(&self, message: impl Into<String>) -> usize {
        self.notify(NotificationLevel::Success, message)
    }

    /// Raise an error notification.
    pub fn error(&self, message: impl Into<String>) -> usize {
        self.notify(NotificationLevel::Error, message)
    }

    /// Get the number of active connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
