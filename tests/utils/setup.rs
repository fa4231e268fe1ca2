use std::sync::Arc;

use coderelay::{
    relay::RelayService, room::InMemoryRoomMembership, user::InMemoryUsernameRegistry,
    websockets::RelayMessageHandler,
};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub relay: Arc<RelayService>,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub input_handler: RelayMessageHandler,
    pub connections: Vec<String>,
}

pub struct TestSetupBuilder {
    connections: Vec<String>,
}

#[allow(dead_code)]
impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            connections: vec![],
        }
    }

    pub fn with_connections(mut self, connections: Vec<&str>) -> Self {
        self.connections = connections.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_connections(self) -> Self {
        self.with_connections(vec!["c1", "c2"])
    }

    pub fn with_three_connections(self) -> Self {
        self.with_connections(vec!["c1", "c2", "c3"])
    }

    pub async fn build(self) -> TestSetup {
        let mock_conn_manager = Arc::new(MockConnectionManager::new());

        for connection_id in &self.connections {
            mock_conn_manager.add_connected(connection_id).await;
        }

        let relay = Arc::new(RelayService::new(
            Arc::new(InMemoryUsernameRegistry::new()),
            Arc::new(InMemoryRoomMembership::new()),
            mock_conn_manager.clone(),
        ));

        let input_handler = RelayMessageHandler::new(relay.clone());

        TestSetup {
            relay,
            mock_conn_manager,
            input_handler,
            connections: self.connections,
        }
    }
}
