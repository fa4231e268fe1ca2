// Public API
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use handler::{websocket_handler, RelayMessageHandler};
pub use messages::{
    ClientEvent, CodeChangePayload, CodePayload, DisconnectedPayload, ErrorPayload, JoinPayload,
    JoinedPayload, MessageType, ProtocolError, SyncCodePayload, WebSocketMessage,
};
pub use middleware::require_allowed_origin;
pub use socket::{Connection, MessageHandler, SocketError, SocketWrapper};

// Internal modules
mod connection_manager;
mod handler;
mod messages;
mod middleware;
mod socket;
