use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Registry of connection ID → display username
///
/// An entry exists for a connection exactly while it has joined at least once
/// and has not yet disconnected. Usernames are not unique: two connections
/// may register the same display name.
#[async_trait]
pub trait UsernameRegistry: Send + Sync {
    /// Insert or overwrite the username for a connection.
    /// Returns the previous username if one was registered.
    async fn register(&self, connection_id: String, username: String) -> Option<String>;

    /// Get username by connection ID
    async fn get_username(&self, connection_id: &str) -> Option<String>;

    /// Remove the entry for a connection, returning the username it held
    async fn remove(&self, connection_id: &str) -> Option<String>;

    /// Get all registered (connection_id, username) pairs (for debugging/monitoring)
    async fn get_all(&self) -> Vec<(String, String)>;
}

/// In-memory implementation of UsernameRegistry
/// Uses RwLock for concurrent access with read optimization
pub struct InMemoryUsernameRegistry {
    connection_to_username: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryUsernameRegistry {
    pub fn new() -> Self {
        Self {
            connection_to_username: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUsernameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsernameRegistry for InMemoryUsernameRegistry {
    async fn register(&self, connection_id: String, username: String) -> Option<String> {
        let mut map = self.connection_to_username.write().await;
        let previous = map.insert(connection_id.clone(), username.clone());

        info!(
            connection_id = %connection_id,
            username = %username,
            previous = ?previous,
            "Registered username for connection"
        );

        previous
    }

    async fn get_username(&self, connection_id: &str) -> Option<String> {
        let map = self.connection_to_username.read().await;
        let result = map.get(connection_id).cloned();

        debug!(
            connection_id = %connection_id,
            username = ?result,
            "Connection to username lookup"
        );

        result
    }

    async fn remove(&self, connection_id: &str) -> Option<String> {
        let mut map = self.connection_to_username.write().await;

        match map.remove(connection_id) {
            Some(username) => {
                info!(
                    connection_id = %connection_id,
                    username = %username,
                    "Removed username registration"
                );
                Some(username)
            }
            None => {
                warn!(
                    connection_id = %connection_id,
                    "Attempted to remove unregistered connection"
                );
                None
            }
        }
    }

    async fn get_all(&self) -> Vec<(String, String)> {
        let map = self.connection_to_username.read().await;
        map.iter()
            .map(|(connection_id, username)| (connection_id.clone(), username.clone()))
            .collect()
    }
}
