use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use crate::relay::RosterEntry;
use crate::shared::{AppError, AppState};

/// HTTP handler for inspecting who is in a room
///
/// GET /rooms/:room_id/clients
/// Returns the roster in join order, or 404 when nobody is in the room
#[instrument(name = "get_room_clients", skip(state))]
pub async fn get_room_clients(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<RosterEntry>>, AppError> {
    if room_id.trim().is_empty() {
        return Err(AppError::BadRequest("room_id must not be empty".to_string()));
    }

    let roster = state.relay.roster(&room_id).await;
    if roster.is_empty() {
        return Err(AppError::NotFound(format!("Room '{}' has no clients", room_id)));
    }

    info!(
        room_id = %room_id,
        client_count = roster.len(),
        "Room roster listed"
    );

    Ok(Json(roster))
}

/// Health check endpoint, with live socket and registered user counts
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let connections = state.connection_manager.count_connections().await;
    let users = state.relay.registered_users().await;

    Json(serde_json::json!({
        "status": "ok",
        "connections": connections,
        "users": users,
    }))
}
