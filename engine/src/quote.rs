//! Quote records.

use crate::{Category, QuoteId, Timestamp};
use serde::{Deserialize, Serialize};

/// Id prefix for quotes created on this device.
pub const LOCAL_PREFIX: &str = "local-";
/// Id prefix for quotes materialized from the remote endpoint.
pub const SERVER_PREFIX: &str = "server-";
/// Category assigned to every fetched quote.
pub const SERVER_CATEGORY: &str = "Server";

/// Where a quote came from, as encoded in its id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Created locally (`local-…`)
    Local,
    /// Fetched from the remote endpoint (`server-…`)
    Server,
    /// Imported with a foreign id scheme
    Unknown,
}

/// A single quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "QuoteRecord")]
pub struct Quote {
    /// Unique identifier inside a store
    pub id: QuoteId,
    /// The quote itself
    pub text: String,
    /// Free-form category label
    pub category: Category,
    /// Creation or last modification instant (milliseconds since epoch)
    pub timestamp: Timestamp,
    /// Whether the quote is known to exist on the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synced: Option<bool>,
}

/// Quote as found in stored or imported files.
///
/// Older files name the instant `lastUpdated`; some carry both fields.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteRecord {
    #[serde(default)]
    id: QuoteId,
    text: String,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    timestamp: Option<Timestamp>,
    #[serde(default)]
    last_updated: Option<Timestamp>,
    #[serde(default)]
    synced: Option<bool>,
}

impl From<QuoteRecord> for Quote {
    fn from(record: QuoteRecord) -> Self {
        Self {
            id: record.id,
            text: record.text,
            category: record.category,
            timestamp: record.timestamp.or(record.last_updated).unwrap_or_default(),
            synced: record.synced,
        }
    }
}

impl Quote {
    /// Create a quote with an explicit id.
    pub fn new(
        id: impl Into<QuoteId>,
        text: impl Into<String>,
        category: impl Into<Category>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            category: category.into(),
            timestamp,
            synced: None,
        }
    }

    /// Create a quote the way a user submission does: `local-<timestamp>`.
    pub fn local(
        text: impl Into<String>,
        category: impl Into<Category>,
        timestamp: Timestamp,
    ) -> Self {
        Self::new(format!("{LOCAL_PREFIX}{timestamp}"), text, category, timestamp)
    }

    /// Materialize a quote from a remote post.
    pub fn from_server(remote_id: u64, title: impl Into<String>, fetched_at: Timestamp) -> Self {
        Self {
            id: format!("{SERVER_PREFIX}{remote_id}"),
            text: title.into(),
            category: SERVER_CATEGORY.to_string(),
            timestamp: fetched_at,
            synced: Some(true),
        }
    }

    /// Origin derived from the id prefix.
    pub fn origin(&self) -> Origin {
        if self.id.starts_with(LOCAL_PREFIX) {
            Origin::Local
        } else if self.id.starts_with(SERVER_PREFIX) {
            Origin::Server
        } else {
            Origin::Unknown
        }
    }

    /// Numeric id on the remote endpoint, if this quote came from there.
    pub fn remote_id(&self) -> Option<u64> {
        self.id.strip_prefix(SERVER_PREFIX)?.parse().ok()
    }
}

/// Quotes shown when storage holds nothing usable.
pub fn seed_quotes(now: Timestamp) -> Vec<Quote> {
    vec![
        Quote::new("local-1", "Believe in yourself", "Motivational", now),
        Quote::new("local-2", "Never give up", "Motivational", now),
        Quote::new("local-3", "The only limit is your mind", "Inspirational", now),
    ]
}
