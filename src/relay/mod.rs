// Room presence and broadcast relay
//
// Tracks which connection is in which room under which name, and forwards
// code edits between connections without storing them.

use thiserror::Error;

// Public API - what other modules can use
pub use roster::{RosterBuilder, RosterEntry};
pub use service::RelayService;

// Internal modules
mod broadcast;
mod roster;
mod service;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}
