// Library crate for the collaborative code relay
// This file exposes the public API for integration tests

pub mod config;
pub mod relay;
pub mod room;
pub mod router;
pub mod shared;
pub mod user;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::RelayConfig;
pub use relay::{RelayService, RosterEntry};
pub use room::{InMemoryRoomMembership, RoomMembership};
pub use router::build_router;
pub use shared::{AppError, AppState};
pub use user::{InMemoryUsernameRegistry, UsernameRegistry};
pub use websockets::{
    ConnectionManager, MessageHandler, MessageType, RelayMessageHandler, WebSocketMessage,
};
