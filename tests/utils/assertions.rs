//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use std::collections::HashSet;

use coderelay::websockets::{MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    connections: Vec<&'a str>,
}

impl<'a> MessageAssertion<'a> {
    /// Create an assertion for every connection in the setup
    pub fn for_all_connections(setup: &'a TestSetup) -> Self {
        let connections = setup.connections.iter().map(|s| s.as_str()).collect();
        Self { setup, connections }
    }

    /// Create an assertion for specific connections
    pub fn for_connections(setup: &'a TestSetup, connections: Vec<&'a str>) -> Self {
        Self { setup, connections }
    }

    /// Assert that connections received a specific message type (consumes the message from queue)
    pub async fn received_message_type(self, expected_type: MessageType) -> MessageContent {
        let mut messages = vec![];

        for connection_id in &self.connections {
            let message = self
                .setup
                .mock_conn_manager
                .consume_message_for(connection_id)
                .await;
            assert!(
                message.is_some(),
                "{} should have received a message",
                connection_id
            );

            let msg: WebSocketMessage = serde_json::from_str(&message.unwrap()).unwrap();
            assert_eq!(
                msg.message_type, expected_type,
                "{} received wrong message type",
                connection_id
            );
            messages.push(msg);
        }

        // Everyone addressed by one relay operation gets the same payload
        if messages.len() > 1 {
            let first_payload = &messages[0].payload;
            for (i, msg) in messages.iter().enumerate().skip(1) {
                assert_eq!(
                    &msg.payload, first_payload,
                    "Connection {} payload differs from connection {}",
                    self.connections[i], self.connections[0]
                );
            }
        }

        MessageContent {
            payload: messages[0].payload.clone(),
        }
    }

    /// Assert that connections have no queued messages
    pub async fn received_no_messages(self) {
        for connection_id in &self.connections {
            let messages = self
                .setup
                .mock_conn_manager
                .get_messages_for(connection_id)
                .await;
            assert!(
                messages.is_empty(),
                "{} should not have received any messages, got {:?}",
                connection_id,
                messages
            );
        }
    }

    /// Count how many messages of a specific type a connection has queued (non-consuming)
    pub async fn count_message_type(&self, connection_id: &str, msg_type: MessageType) -> usize {
        let messages = self
            .setup
            .mock_conn_manager
            .get_messages_for(connection_id)
            .await;
        messages
            .iter()
            .filter_map(|msg_str| serde_json::from_str::<WebSocketMessage>(msg_str).ok())
            .filter(|msg| msg.message_type == msg_type)
            .count()
    }
}

// ============================================================================
// Message Content Assertions
// ============================================================================

pub struct MessageContent {
    payload: serde_json::Value,
}

impl MessageContent {
    pub fn with_code(self, expected_code: &str) -> Self {
        assert_eq!(self.payload["code"], expected_code);
        self
    }

    pub fn with_socket_id(self, expected_socket_id: &str) -> Self {
        assert_eq!(self.payload["socketId"], expected_socket_id);
        self
    }

    pub fn with_username(self, expected_username: &str) -> Self {
        assert_eq!(self.payload["username"], expected_username);
        self
    }

    /// Assert the roster matches exactly, ignoring order
    pub fn with_clients(self, expected: Vec<(&str, &str)>) -> Self {
        let clients = self.payload["clients"]
            .as_array()
            .expect("payload should carry a clients array");
        let actual: HashSet<(String, String)> = clients
            .iter()
            .map(|c| {
                (
                    c["socketId"].as_str().unwrap().to_string(),
                    c["username"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        let expected_set: HashSet<(String, String)> = expected
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();

        assert_eq!(clients.len(), expected.len(), "roster has duplicate entries");
        assert_eq!(actual, expected_set);
        self
    }

    pub fn with_message_containing(self, fragment: &str) -> Self {
        let message = self.payload["message"].as_str().unwrap_or_default();
        assert!(
            message.contains(fragment),
            "error message '{}' should contain '{}'",
            message,
            fragment
        );
        self
    }
}
