//! Request handlers for the quote API.

mod quotes;
mod websocket;

pub use quotes::*;
pub use websocket::handle_websocket_connection;
