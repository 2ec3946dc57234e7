//! # Quotebook Engine
//!
//! Quote storage and reconciliation for a local-first quote manager.
//!
//! This crate holds the pieces of Quotebook that do not need a network or a
//! filesystem: the quote record, the store that owns the ordered list of
//! quotes, the reconciler that folds a batch of server quotes into it, and
//! the JSON interchange format used for import and export.
//!
//! ## Design Principles
//!
//! - **No network**: fetching remote quotes is the caller's job
//! - **Injected persistence**: the store writes through a [`Storage`]
//!   implementation after every mutation
//! - **Deterministic merge**: the same local list and remote batch always
//!   produce the same result
//!
//! ## Core Concepts
//!
//! ### Quotes
//!
//! A [`Quote`] has an id (`local-…` or `server-…`), text, category and a
//! millisecond timestamp. Ids are unique inside a store; content is not.
//!
//! ### Reconciliation
//!
//! The [`Reconciler`] appends remote quotes with unknown ids and asks a
//! [`ConflictResolver`] what to do with known ones. [`MergeStrategy`]
//! provides the built-in policies:
//! - [`MergeStrategy::LastWriteWins`] - strictly newer remote timestamp wins (default)
//! - [`MergeStrategy::LocalWins`] - local copy is never replaced
//! - [`MergeStrategy::ServerWins`] - remote copy always replaces
//!
//! ## Quick Start
//!
//! ```rust
//! use quotebook_engine::{MemoryStorage, MergeStrategy, Quote, QuoteStore};
//!
//! let mut store = QuoteStore::open(Box::new(MemoryStorage::new()), 1_000);
//! assert_eq!(store.len(), 3); // seeded
//!
//! store.add("Stay hungry", "Motivational", 2_000).unwrap();
//!
//! let remote = vec![Quote::from_server(7, "sunt aut facere", 3_000)];
//! let result = store.merge(remote, &MergeStrategy::LastWriteWins).unwrap();
//! assert_eq!(result.added, vec!["server-7".to_string()]);
//! assert_eq!(store.len(), 5);
//! ```
//!
//! ## Persistence
//!
//! The store persists the whole list as a JSON array under [`QUOTES_KEY`]
//! and falls back to [`seed_quotes`] when nothing usable is stored. Use
//! [`export_json`] and [`parse_import`] for file interchange.

pub mod error;
pub mod interchange;
pub mod quote;
pub mod reconcile;
pub mod storage;
pub mod store;

// Re-export main types at crate root
pub use error::Error;
pub use interchange::{export_json, parse_import, EXPORT_FILE_NAME};
pub use quote::{seed_quotes, Origin, Quote, LOCAL_PREFIX, SERVER_CATEGORY, SERVER_PREFIX};
pub use reconcile::{ConflictResolver, MergeStrategy, ReconcileResult, Reconciler, Resolution};
pub use storage::{MemoryStorage, Storage, LAST_SYNC_KEY, QUOTES_KEY, SELECTED_CATEGORY_KEY};
pub use store::{LoadOutcome, QuoteStore};

/// Type aliases for clarity
pub type QuoteId = String;
pub type Category = String;
pub type Timestamp = u64;
