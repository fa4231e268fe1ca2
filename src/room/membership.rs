use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Result of adding a connection to a room
#[derive(Debug, Clone, PartialEq)]
pub enum JoinRoomResult {
    /// The connection was added to the room
    Joined,
    /// The connection was already a member; membership is unchanged
    AlreadyMember,
}

/// Grouping primitive that tracks which connections belong to which rooms
///
/// Rooms are implicit: a room exists while it has at least one member.
/// Member lists are returned in join order.
#[async_trait]
pub trait RoomMembership: Send + Sync {
    async fn join(&self, connection_id: &str, room_id: &str) -> JoinRoomResult;

    /// Remove a connection from one room. Returns false if it was not a member.
    async fn leave(&self, connection_id: &str, room_id: &str) -> bool;

    /// Remove a connection from every room, returning the rooms it left
    async fn leave_all(&self, connection_id: &str) -> Vec<String>;

    async fn members(&self, room_id: &str) -> Vec<String>;

    async fn rooms_of(&self, connection_id: &str) -> Vec<String>;
}

#[derive(Default)]
struct MembershipIndex {
    // room_id -> connection ids, join order
    room_to_connections: HashMap<String, Vec<String>>,
    // connection_id -> room ids, join order
    connection_to_rooms: HashMap<String, Vec<String>>,
}

impl MembershipIndex {
    fn remove_pair(&mut self, connection_id: &str, room_id: &str) -> bool {
        let mut removed = false;

        if let Some(members) = self.room_to_connections.get_mut(room_id) {
            let before = members.len();
            members.retain(|id| id != connection_id);
            removed = members.len() != before;
            if members.is_empty() {
                self.room_to_connections.remove(room_id);
                debug!(room_id = %room_id, "Room is empty, dropping it");
            }
        }

        if let Some(rooms) = self.connection_to_rooms.get_mut(connection_id) {
            rooms.retain(|id| id != room_id);
            if rooms.is_empty() {
                self.connection_to_rooms.remove(connection_id);
            }
        }

        removed
    }
}

/// In-memory implementation of RoomMembership, local to this process
pub struct InMemoryRoomMembership {
    index: RwLock<MembershipIndex>,
}

impl Default for InMemoryRoomMembership {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomMembership {
    pub fn new() -> Self {
        Self {
            index: RwLock::new(MembershipIndex::default()),
        }
    }
}

#[async_trait]
impl RoomMembership for InMemoryRoomMembership {
    #[instrument(skip(self))]
    async fn join(&self, connection_id: &str, room_id: &str) -> JoinRoomResult {
        let mut index = self.index.write().await;

        let members = index
            .room_to_connections
            .entry(room_id.to_string())
            .or_default();
        if members.iter().any(|id| id == connection_id) {
            debug!("Connection already in room");
            return JoinRoomResult::AlreadyMember;
        }
        members.push(connection_id.to_string());

        index
            .connection_to_rooms
            .entry(connection_id.to_string())
            .or_default()
            .push(room_id.to_string());

        debug!("Connection added to room");
        JoinRoomResult::Joined
    }

    #[instrument(skip(self))]
    async fn leave(&self, connection_id: &str, room_id: &str) -> bool {
        let mut index = self.index.write().await;
        index.remove_pair(connection_id, room_id)
    }

    #[instrument(skip(self))]
    async fn leave_all(&self, connection_id: &str) -> Vec<String> {
        let mut index = self.index.write().await;

        let rooms = index
            .connection_to_rooms
            .get(connection_id)
            .cloned()
            .unwrap_or_default();
        for room_id in &rooms {
            index.remove_pair(connection_id, room_id);
        }

        debug!(rooms_left = rooms.len(), "Connection removed from all rooms");
        rooms
    }

    async fn members(&self, room_id: &str) -> Vec<String> {
        let index = self.index.read().await;
        index
            .room_to_connections
            .get(room_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn rooms_of(&self, connection_id: &str) -> Vec<String> {
        let index = self.index.read().await;
        index
            .connection_to_rooms
            .get(connection_id)
            .cloned()
            .unwrap_or_default()
    }
}
