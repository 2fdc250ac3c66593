//! Server configuration module
//! Handles dynamic configuration parameters for the matchmaking server

use crate::constants::{
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RATE_LIMIT_BURST, DEFAULT_RATE_LIMIT_WINDOW_SECS,
    DEVELOPMENT_SEARCH_TIMEOUT_SECS, PRODUCTION_SEARCH_TIMEOUT_SECS,
};
use crate::error::{GridMatchError, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Production mode shortens the matchmaking search timeout
    pub production_mode: bool,
    /// Admission token bucket capacity per source address
    pub rate_limit_burst: u32,
    /// Window over which an empty bucket refills to full
    pub rate_limit_window: Duration,
}

impl ServerConfig {
    /// Create a fixed configuration for unit tests
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            production_mode: false,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
            rate_limit_window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
        }
    }

    /// Load configuration from environment variables if available.
    /// Unset or unparseable values fall back to the compiled-in defaults.
    pub fn from_env() -> Self {
        let host = env::var("GRIDMATCH_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("GRIDMATCH_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let production_mode = env::var("GRIDMATCH_PRODUCTION")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        let rate_limit_burst = env::var("GRIDMATCH_RATE_LIMIT")
            .ok()
            .and_then(|r| r.parse().ok())
            .unwrap_or(DEFAULT_RATE_LIMIT_BURST);

        let window_secs = env::var("GRIDMATCH_RATE_WINDOW_SECS")
            .ok()
            .and_then(|w| w.parse().ok())
            .unwrap_or(DEFAULT_RATE_LIMIT_WINDOW_SECS);

        Self {
            host,
            port,
            production_mode,
            rate_limit_burst,
            rate_limit_window: Duration::from_secs(window_secs),
        }
    }

    /// How long a waiting player is kept in the queue before eviction
    pub fn search_timeout(&self) -> Duration {
        if self.production_mode {
            Duration::from_secs(PRODUCTION_SEARCH_TIMEOUT_SECS)
        } else {
            Duration::from_secs(DEVELOPMENT_SEARCH_TIMEOUT_SECS)
        }
    }

    /// The address to bind the listener to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| GridMatchError::ConfigError(format!("Invalid listen address: {}", e)))
    }
}
