//! Murmur relay server.
//!
//! Accepts WebSocket connections from Murmur clients and fans out their
//! `chat` and `typing` events to the rest of the lobby.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use ui::{ServerConfig, ServerError, run as run_server, serve};
