use serde_json::json;

use coderelay::websockets::{ConnectionManager, MessageHandler, MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

#[allow(dead_code)]
impl TestSetup {
    /// Send a WebSocket message as if it arrived on the given connection
    pub async fn send_message(&self, connection_id: &str, message: WebSocketMessage) {
        let message_json = serde_json::to_string(&message).unwrap();
        self.send_raw(connection_id, &message_json).await;
    }

    /// Send an arbitrary text frame
    pub async fn send_raw(&self, connection_id: &str, frame: &str) {
        self.input_handler
            .handle_message(connection_id, frame.to_string())
            .await;
    }

    /// Close a connection the way the socket handler does on disconnect
    pub async fn disconnect(&self, connection_id: &str) {
        self.mock_conn_manager
            .remove_connection(connection_id)
            .await;
        self.relay.disconnecting(connection_id).await.unwrap();
    }

    /// Clear all recorded messages
    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn send_join(&self, connection_id: &str, room_id: &str, username: &str) {
        self.send_message(
            connection_id,
            WebSocketMessage::new(
                MessageType::Join,
                json!({ "roomId": room_id, "username": username }),
            ),
        )
        .await;
    }

    pub async fn send_code_change(&self, connection_id: &str, room_id: &str, code: &str) {
        self.send_message(
            connection_id,
            WebSocketMessage::new(
                MessageType::CodeChange,
                json!({ "roomId": room_id, "code": code }),
            ),
        )
        .await;
    }

    pub async fn send_sync_code(&self, connection_id: &str, target: &str, code: &str) {
        self.send_message(
            connection_id,
            WebSocketMessage::new(
                MessageType::SyncCode,
                json!({ "socketId": target, "code": code }),
            ),
        )
        .await;
    }
}
