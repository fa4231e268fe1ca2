// Public API - what other modules can use
pub use handlers::{get_room_clients, health_check};
pub use membership::{InMemoryRoomMembership, JoinRoomResult, RoomMembership};

// Internal modules
mod handlers;
mod membership;
