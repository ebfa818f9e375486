//! Configuration
//!
//! Environment-driven configuration for the server, storage selection, and
//! logging. Everything has a sensible default so the service starts with no
//! environment at all (in-memory storage on port 8080).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Storage configuration
    pub storage: StorageConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file; in-memory storage when unset
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Enable request/response span logging
    pub log_requests: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_requests: false,
        }
    }
}

impl IdentityConfig {
    /// Loads configuration from `VOUCHNET_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = env::var("VOUCHNET_HOST") {
            if !host.is_empty() {
                config.server.host = host;
            }
        }
        if let Ok(port) = env::var("VOUCHNET_PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("Invalid VOUCHNET_PORT value: {port}"))?;
        }
        if let Ok(path) = env::var("VOUCHNET_DB_PATH") {
            if !path.is_empty() {
                config.storage.path = Some(path);
            }
        }
        if let Ok(level) = env::var("VOUCHNET_LOG_LEVEL") {
            if !level.is_empty() {
                config.logging.level = level;
            }
        }
        if let Ok(value) = env::var("VOUCHNET_LOG_REQUESTS") {
            config.logging.log_requests = value == "1" || value.eq_ignore_ascii_case("true");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IdentityConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(config.storage.path.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.log_requests);
    }
}
