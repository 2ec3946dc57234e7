//! Key-value persistence used by the store.
//!
//! The store never touches a filesystem directly. It is handed a [`Storage`]
//! and writes through it after every mutation. Each key holds one JSON
//! document, overwritten wholesale on every write.

use crate::error::Result;
use std::collections::BTreeMap;

/// Key holding the JSON array of all quotes.
pub const QUOTES_KEY: &str = "quotes";
/// Key holding the last selected category filter.
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";
/// Key holding the millisecond timestamp of the last successful sync.
pub const LAST_SYNC_KEY: &str = "lastSyncTime";

/// Durable string key-value storage.
pub trait Storage: Send {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing the previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Drop the value stored under `key`.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory storage, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.entries.insert(key.into(), value.into());
        storage
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
