use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::relay::RelayService;
use crate::room::InMemoryRoomMembership;
use crate::user::InMemoryUsernameRegistry;
use crate::websockets::{ConnectionManager, InMemoryConnectionManager};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    /// The only browser origin allowed to open a socket
    pub allowed_origin: HeaderValue,
}

impl AppState {
    pub fn new(
        relay: Arc<RelayService>,
        connection_manager: Arc<dyn ConnectionManager>,
        allowed_origin: HeaderValue,
    ) -> Self {
        Self {
            relay,
            connection_manager,
            allowed_origin,
        }
    }

    /// Wire the relay to process-local registry, membership and connection stores
    pub fn in_memory(allowed_origin: HeaderValue) -> Self {
        let connection_manager: Arc<dyn ConnectionManager> =
            Arc::new(InMemoryConnectionManager::new());
        let relay = Arc::new(RelayService::new(
            Arc::new(InMemoryUsernameRegistry::new()),
            Arc::new(InMemoryRoomMembership::new()),
            Arc::clone(&connection_manager),
        ));
        Self::new(relay, connection_manager, allowed_origin)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
