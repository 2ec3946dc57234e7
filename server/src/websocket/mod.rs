//! WebSocket support for user notifications.
//!
//! Clients connect to `/notifications` and receive transient messages about
//! syncs, imports and failures as they happen.

mod manager;
mod protocol;

pub use manager::ConnectionManager;
pub use protocol::*;
