use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::relay::RosterEntry;

/// Event names used on the wire
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    // Client -> Server
    Join,
    SyncCode,

    // Both directions: inbound carries a room, outbound carries only the code
    CodeChange,

    // Server -> Client
    Joined,
    Disconnected,
    Error,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<WebSocketMessageMeta>,
}

/// Inbound frame as clients send it. Any `meta` they attach is ignored.
#[derive(Debug, Deserialize)]
struct ClientEnvelope {
    #[serde(rename = "type")]
    message_type: MessageType,
    #[serde(default)]
    payload: serde_json::Value,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    pub room_id: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeChangePayload {
    pub room_id: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncCodePayload {
    pub socket_id: String,
    pub code: String,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinedPayload {
    pub clients: Vec<RosterEntry>,
    pub username: String,
    /// Connection that triggered this roster update
    pub socket_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodePayload {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectedPayload {
    pub socket_id: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorPayload {
    pub message: String,
}

/// A decoded and validated client event
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Join(JoinPayload),
    CodeChange(CodeChangePayload),
    SyncCode(SyncCodePayload),
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("'{0:?}' cannot be sent by a client")]
    UnexpectedType(MessageType),

    #[error("Invalid '{message_type:?}' payload: {reason}")]
    InvalidPayload {
        message_type: MessageType,
        reason: String,
    },
}

impl ClientEvent {
    /// Decode a raw text frame into a client event, validating required fields
    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        let message = serde_json::from_str::<ClientEnvelope>(raw)
            .map_err(|e| ProtocolError::MalformedFrame(e.to_string()))?;

        match message.message_type {
            MessageType::Join => {
                let payload: JoinPayload = parse_payload(message.message_type, message.payload)?;
                require_non_empty(message.message_type, "roomId", &payload.room_id)?;
                Ok(ClientEvent::Join(payload))
            }
            MessageType::CodeChange => {
                let payload: CodeChangePayload =
                    parse_payload(message.message_type, message.payload)?;
                require_non_empty(message.message_type, "roomId", &payload.room_id)?;
                Ok(ClientEvent::CodeChange(payload))
            }
            MessageType::SyncCode => {
                let payload: SyncCodePayload =
                    parse_payload(message.message_type, message.payload)?;
                require_non_empty(message.message_type, "socketId", &payload.socket_id)?;
                Ok(ClientEvent::SyncCode(payload))
            }
            other => Err(ProtocolError::UnexpectedType(other)),
        }
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            ClientEvent::Join(_) => MessageType::Join,
            ClientEvent::CodeChange(_) => MessageType::CodeChange,
            ClientEvent::SyncCode(_) => MessageType::SyncCode,
        }
    }
}

fn parse_payload<T>(message_type: MessageType, payload: serde_json::Value) -> Result<T, ProtocolError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_value(payload).map_err(|e| ProtocolError::InvalidPayload {
        message_type,
        reason: e.to_string(),
    })
}

fn require_non_empty(
    message_type: MessageType,
    field: &str,
    value: &str,
) -> Result<(), ProtocolError> {
    if value.trim().is_empty() {
        return Err(ProtocolError::InvalidPayload {
            message_type,
            reason: format!("{} must not be empty", field),
        });
    }
    Ok(())
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
            }),
        }
    }

    fn with_payload<P: Serialize>(
        message_type: MessageType,
        payload: P,
    ) -> serde_json::Result<Self> {
        Ok(Self::new(message_type, serde_json::to_value(payload)?))
    }

    /// Create a JOINED message carrying the room roster
    pub fn joined(
        clients: Vec<RosterEntry>,
        username: String,
        socket_id: String,
    ) -> serde_json::Result<Self> {
        Self::with_payload(
            MessageType::Joined,
            JoinedPayload {
                clients,
                username,
                socket_id,
            },
        )
    }

    /// Create an outbound CODE_CHANGE message
    pub fn code_change(code: String) -> serde_json::Result<Self> {
        Self::with_payload(MessageType::CodeChange, CodePayload { code })
    }

    /// Create a DISCONNECTED message
    pub fn disconnected(socket_id: String, username: String) -> serde_json::Result<Self> {
        Self::with_payload(
            MessageType::Disconnected,
            DisconnectedPayload {
                socket_id,
                username,
            },
        )
    }

    /// Create an ERROR message
    pub fn error(message: String) -> serde_json::Result<Self> {
        Self::with_payload(MessageType::Error, ErrorPayload { message })
    }
}
