use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::relay::RelayService;
use crate::shared::AppState;
use crate::websockets::messages::ClientEvent;

use super::socket::{Connection, MessageHandler};

/// Decodes client frames and dispatches them to the relay
pub struct RelayMessageHandler {
    relay: Arc<RelayService>,
}

impl RelayMessageHandler {
    pub fn new(relay: Arc<RelayService>) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl MessageHandler for RelayMessageHandler {
    async fn handle_message(&self, connection_id: &str, message: String) {
        debug!(
            connection_id = %connection_id,
            message = %message,
            "Received message"
        );

        let event = match ClientEvent::decode(&message) {
            Ok(event) => event,
            Err(e) => {
                if let Err(send_err) = self.relay.reject(connection_id, &e).await {
                    warn!(
                        connection_id = %connection_id,
                        error = %send_err,
                        "Failed to send error message"
                    );
                }
                return;
            }
        };

        let message_type = event.message_type();
        let result = match event {
            ClientEvent::Join(payload) => self
                .relay
                .join(connection_id, &payload.room_id, &payload.username)
                .await
                .map(|_| ()),
            ClientEvent::CodeChange(payload) => self
                .relay
                .code_change(connection_id, &payload.room_id, &payload.code)
                .await
                .map(|_| ()),
            ClientEvent::SyncCode(payload) => self
                .relay
                .sync_code(connection_id, &payload.socket_id, &payload.code)
                .await
                .map(|_| ()),
        };

        if let Err(e) = result {
            warn!(
                connection_id = %connection_id,
                message_type = ?message_type,
                error = %e,
                "Relay operation failed"
            );
        }
    }
}

/// WebSocket endpoint
/// GET /ws
///
/// Connections are anonymous; the server assigns each one a fresh ID.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> Response {
    let connection_id = Uuid::new_v4().to_string();

    info!(
        connection_id = %connection_id,
        "WebSocket connection requested"
    );

    ws.on_upgrade(move |socket| handle_websocket_connection(socket, connection_id, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    connection_id: String,
    app_state: AppState,
) {
    info!(
        connection_id = %connection_id,
        "WebSocket connection established"
    );

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    app_state
        .connection_manager
        .add_connection(connection_id.clone(), outbound_sender)
        .await;

    let message_handler = Arc::new(RelayMessageHandler::new(Arc::clone(&app_state.relay)));

    let connection = Connection::new(
        connection_id.clone(),
        Box::new(socket),
        outbound_receiver,
        message_handler,
    );

    // Run the connection until disconnect
    let outcome = connection.run().await;
    let username = app_state.relay.username_of(&connection_id).await;
    match outcome {
        Ok(()) => {
            info!(
                connection_id = %connection_id,
                username = ?username,
                "WebSocket connection closed cleanly"
            );
        }
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                username = ?username,
                error = %e,
                "WebSocket connection error"
            );
        }
    }

    // Cleanup: stop queueing to this socket, then notify its rooms
    app_state
        .connection_manager
        .remove_connection(&connection_id)
        .await;

    if let Err(e) = app_state.relay.disconnecting(&connection_id).await {
        warn!(
            connection_id = %connection_id,
            error = %e,
            "Failed to notify rooms of disconnect"
        );
    }
}
