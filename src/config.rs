use axum::http::HeaderValue;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::debug;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid BIND_ADDR '{value}': {reason}")]
    InvalidBindAddr { value: String, reason: String },

    #[error("ALLOWED_ORIGIN must not be empty")]
    EmptyOrigin,

    #[error("Invalid ALLOWED_ORIGIN '{0}'")]
    InvalidOrigin(String),
}

/// Runtime configuration for the relay server
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    /// The single origin allowed to open sockets and call the HTTP routes
    pub allowed_origin: HeaderValue,
}

impl RelayConfig {
    /// Reads `BIND_ADDR` and `ALLOWED_ORIGIN`, falling back to development defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddr {
                value: raw_addr.clone(),
                reason: e.to_string(),
            })?;

        let allowed_origin =
            lookup("ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());
        let allowed_origin = allowed_origin.trim().to_string();
        if allowed_origin.is_empty() {
            return Err(ConfigError::EmptyOrigin);
        }
        let allowed_origin = HeaderValue::from_str(&allowed_origin)
            .map_err(|_| ConfigError::InvalidOrigin(allowed_origin.clone()))?;

        debug!(
            bind_addr = %bind_addr,
            allowed_origin = ?allowed_origin,
            "Loaded relay configuration"
        );

        Ok(Self {
            bind_addr,
            allowed_origin,
        })
    }
}
