use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::{room::RoomMembership, user::UsernameRegistry};

/// One connection in a room together with the name it joined under
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub socket_id: String,
    pub username: String,
}

pub struct RosterBuilder;

impl RosterBuilder {
    /// Join the room's members with their registered usernames, in join order
    pub async fn build(
        membership: &Arc<dyn RoomMembership>,
        registry: &Arc<dyn UsernameRegistry>,
        room_id: &str,
    ) -> Vec<RosterEntry> {
        let mut roster = Vec::new();
        for connection_id in membership.members(room_id).await {
            match registry.get_username(&connection_id).await {
                Some(username) => roster.push(RosterEntry {
                    socket_id: connection_id,
                    username,
                }),
                None => {
                    warn!(
                        room_id = %room_id,
                        connection_id = %connection_id,
                        "Room member has no registered username"
                    );
                }
            }
        }
        roster
    }
}
