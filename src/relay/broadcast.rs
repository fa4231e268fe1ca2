use std::sync::Arc;

use super::RelayError;
use crate::websockets::{ConnectionManager, WebSocketMessage};

pub struct MessageBroadcaster;

impl MessageBroadcaster {
    pub async fn broadcast_to_connections(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_ids: &[String],
        message: &WebSocketMessage,
    ) -> Result<(), RelayError> {
        let message_json = serde_json::to_string(message)?;
        connection_manager
            .send_to_connections(connection_ids, &message_json)
            .await;
        Ok(())
    }

    pub async fn send_to_connection(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_id: &str,
        message: &WebSocketMessage,
    ) -> Result<(), RelayError> {
        let message_json = serde_json::to_string(message)?;
        connection_manager
            .send_to_connection(connection_id, &message_json)
            .await;
        Ok(())
    }
}
