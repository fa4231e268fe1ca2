use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::{
    broadcast::MessageBroadcaster,
    roster::{RosterBuilder, RosterEntry},
    RelayError,
};
use crate::{
    room::RoomMembership,
    user::UsernameRegistry,
    websockets::{ConnectionManager, ProtocolError, WebSocketMessage},
};

/// Room presence and broadcast relay
///
/// Operations are serialized through `gate`, so each one observes and
/// mutates the registry and the membership index as a single step.
pub struct RelayService {
    registry: Arc<dyn UsernameRegistry>,
    membership: Arc<dyn RoomMembership>,
    connection_manager: Arc<dyn ConnectionManager>,
    gate: Mutex<()>,
}

impl RelayService {
    pub fn new(
        registry: Arc<dyn UsernameRegistry>,
        membership: Arc<dyn RoomMembership>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            registry,
            membership,
            connection_manager,
            gate: Mutex::new(()),
        }
    }

    /// Register `username` for the connection, add it to the room and send
    /// the resulting roster to every member, the joiner included.
    #[instrument(skip(self))]
    pub async fn join(
        &self,
        connection_id: &str,
        room_id: &str,
        username: &str,
    ) -> Result<Vec<RosterEntry>, RelayError> {
        let _guard = self.gate.lock().await;

        self.registry
            .register(connection_id.to_string(), username.to_string())
            .await;
        let result = self.membership.join(connection_id, room_id).await;

        let roster = RosterBuilder::build(&self.membership, &self.registry, room_id).await;
        let recipients: Vec<String> = roster.iter().map(|e| e.socket_id.clone()).collect();

        let message = WebSocketMessage::joined(
            roster.clone(),
            username.to_string(),
            connection_id.to_string(),
        )?;
        MessageBroadcaster::broadcast_to_connections(
            &self.connection_manager,
            &recipients,
            &message,
        )
        .await?;

        info!(
            join_result = ?result,
            members = roster.len(),
            "Connection joined room"
        );

        Ok(roster)
    }

    /// Forward code to every other member of the room.
    /// Returns the number of connections the update was sent to.
    #[instrument(skip(self, code), fields(code_len = code.len()))]
    pub async fn code_change(
        &self,
        sender_id: &str,
        room_id: &str,
        code: &str,
    ) -> Result<usize, RelayError> {
        let _guard = self.gate.lock().await;

        let recipients: Vec<String> = self
            .membership
            .members(room_id)
            .await
            .into_iter()
            .filter(|id| id != sender_id)
            .collect();

        if recipients.is_empty() {
            debug!("No other members in room, nothing to relay");
            return Ok(0);
        }

        let message = WebSocketMessage::code_change(code.to_string())?;
        MessageBroadcaster::broadcast_to_connections(
            &self.connection_manager,
            &recipients,
            &message,
        )
        .await?;

        debug!(recipients = recipients.len(), "Relayed code change");
        Ok(recipients.len())
    }

    /// Send code to a single connection, regardless of the rooms either side is in.
    /// Returns false when the target is not connected; nothing is sent then.
    #[instrument(skip(self, code), fields(code_len = code.len()))]
    pub async fn sync_code(
        &self,
        sender_id: &str,
        target_id: &str,
        code: &str,
    ) -> Result<bool, RelayError> {
        let _guard = self.gate.lock().await;

        if !self.connection_manager.is_connected(target_id).await {
            debug!("Sync target is not connected, dropping");
            return Ok(false);
        }

        let message = WebSocketMessage::code_change(code.to_string())?;
        MessageBroadcaster::send_to_connection(&self.connection_manager, target_id, &message)
            .await?;

        debug!("Synced code to target connection");
        Ok(true)
    }

    /// Notify the other members of every room the connection is in, then
    /// forget its username and memberships. Returns the rooms that were notified.
    #[instrument(skip(self))]
    pub async fn disconnecting(&self, connection_id: &str) -> Result<Vec<String>, RelayError> {
        let _guard = self.gate.lock().await;

        // Read before removal so the notification carries the joined name
        let username = self
            .registry
            .get_username(connection_id)
            .await
            .unwrap_or_default();
        let rooms = self.membership.rooms_of(connection_id).await;

        let mut outcome = Ok(());
        if !rooms.is_empty() {
            match WebSocketMessage::disconnected(connection_id.to_string(), username.clone()) {
                Ok(message) => {
                    for room_id in &rooms {
                        let others: Vec<String> = self
                            .membership
                            .members(room_id)
                            .await
                            .into_iter()
                            .filter(|id| id != connection_id)
                            .collect();

                        if let Err(e) = MessageBroadcaster::broadcast_to_connections(
                            &self.connection_manager,
                            &others,
                            &message,
                        )
                        .await
                        {
                            outcome = Err(e);
                            break;
                        }

                        debug!(
                            room_id = %room_id,
                            notified = others.len(),
                            "Notified room of disconnect"
                        );
                    }
                }
                Err(e) => outcome = Err(e.into()),
            }
        }

        // Cleanup runs even if a notification could not be encoded
        self.registry.remove(connection_id).await;
        self.membership.leave_all(connection_id).await;

        info!(
            username = %username,
            rooms = rooms.len(),
            "Connection disconnected"
        );

        outcome.map(|_| rooms)
    }

    /// Tell a connection its last frame was rejected
    pub async fn reject(
        &self,
        connection_id: &str,
        error: &ProtocolError,
    ) -> Result<(), RelayError> {
        warn!(
            connection_id = %connection_id,
            error = %error,
            "Rejecting client frame"
        );

        let message = WebSocketMessage::error(error.to_string())?;
        MessageBroadcaster::send_to_connection(&self.connection_manager, connection_id, &message)
            .await
    }

    /// Current roster of a room
    pub async fn roster(&self, room_id: &str) -> Vec<RosterEntry> {
        let _guard = self.gate.lock().await;
        RosterBuilder::build(&self.membership, &self.registry, room_id).await
    }

    pub async fn username_of(&self, connection_id: &str) -> Option<String> {
        self.registry.get_username(connection_id).await
    }

    /// Number of connections that currently have a username registered
    pub async fn registered_users(&self) -> usize {
        self.registry.get_all().await.len()
    }
}
