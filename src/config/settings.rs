//! # Configuration Settings
//!
//! Configuration for the connector registry service, loaded from environment
//! variables (after `.env` loading in `main`).

use crate::errors::{RegistryError, Result};
use crate::secrets::VaultConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AppConfig {
    /// gRPC server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Database configuration
    #[validate(nested)]
    pub database: DatabaseConfig,

    /// Secret store configuration
    pub secrets: SecretsConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load the full configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env(),
            secrets: SecretsConfig::from_env(),
            observability: ObservabilityConfig::from_env(),
        };

        config.validate_all()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate_all(&self) -> Result<()> {
        Validate::validate(self).map_err(RegistryError::from)?;

        if !self.database.url.starts_with("postgres://")
            && !self.database.url.starts_with("postgresql://")
        {
            return Err(RegistryError::validation(
                "Database URL must start with 'postgres://' or 'postgresql://'",
            ));
        }

        Ok(())
    }
}

/// gRPC server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Bind address cannot be empty"))]
    pub bind_address: String,

    /// Server port
    #[validate(range(min = 1, message = "Port must be between 1 and 65535"))]
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    #[validate(range(
        min = 1,
        max = 300,
        message = "Shutdown timeout must be between 1 and 300 seconds"
    ))]
    pub graceful_shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 50051,
            graceful_shutdown_timeout_seconds: 5,
        }
    }
}

impl ServerConfig {
    /// Get the server bind address as `host:port`
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get the graceful shutdown timeout as Duration
    pub fn graceful_shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.graceful_shutdown_timeout_seconds)
    }

    /// Create ServerConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let bind_address =
            std::env::var("RPC_BIND_ADDRESS").unwrap_or_else(|_| defaults.bind_address);

        let port = match std::env::var("RPC_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|e| RegistryError::config(format!("Invalid RPC port: {}", e)))?,
            Err(_) => defaults.port,
        };

        let graceful_shutdown_timeout_seconds = std::env::var("RPC_GRACEFUL_SHUTDOWN_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.graceful_shutdown_timeout_seconds);

        Ok(Self { bind_address, port, graceful_shutdown_timeout_seconds })
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[validate(length(min = 1, message = "Database URL cannot be empty"))]
    pub url: String,

    /// Maximum number of connections in the pool
    #[validate(range(min = 1, max = 100, message = "Max connections must be between 1 and 100"))]
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[validate(range(
        min = 1,
        max = 60,
        message = "Connect timeout must be between 1 and 60 seconds"
    ))]
    pub connect_timeout_seconds: u64,

    /// Idle timeout in seconds (0 = no timeout)
    pub idle_timeout_seconds: u64,

    /// Enable automatic migrations
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/connectors".to_string(),
            max_connections: 10,
            min_connections: 0,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 600,
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Get connection timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Get idle timeout as Duration (None if 0)
    pub fn idle_timeout(&self) -> Option<Duration> {
        if self.idle_timeout_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.idle_timeout_seconds))
        }
    }

    /// Create DatabaseConfig from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let url = std::env::var("DATABASE_URL").unwrap_or(defaults.url);

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.max_connections);

        let min_connections = std::env::var("DATABASE_MIN_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.min_connections);

        let connect_timeout_seconds = std::env::var("DATABASE_CONNECT_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.connect_timeout_seconds);

        let idle_timeout_seconds = std::env::var("DATABASE_IDLE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.idle_timeout_seconds);

        let auto_migrate = std::env::var("DATABASE_AUTO_MIGRATE")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(defaults.auto_migrate);

        Self {
            url,
            max_connections,
            min_connections,
            connect_timeout_seconds,
            idle_timeout_seconds,
            auto_migrate,
        }
    }
}

/// Which secret store backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SecretsBackend {
    #[default]
    Vault,
    /// Development and tests only
    Memory,
}

/// Secret store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecretsConfig {
    /// Backend selector
    pub backend: SecretsBackend,

    /// Vault connection settings (used when `backend` is `Vault`)
    pub vault: VaultConfig,
}

impl SecretsConfig {
    /// Create SecretsConfig from environment variables
    pub fn from_env() -> Self {
        let backend = match std::env::var("SECRETS_BACKEND").as_deref() {
            Ok("memory") => SecretsBackend::Memory,
            _ => SecretsBackend::Vault,
        };

        let vault_defaults = VaultConfig::default();
        let vault = VaultConfig {
            address: std::env::var("VAULT_ADDR").unwrap_or(vault_defaults.address),
            token: std::env::var("VAULT_TOKEN").ok(),
            namespace: std::env::var("VAULT_NAMESPACE").ok(),
            mount_path: std::env::var("VAULT_MOUNT_PATH").unwrap_or(vault_defaults.mount_path),
        };

        Self { backend, vault }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Service name used in log output
    pub service_name: String,

    /// Log level filter (overridden by RUST_LOG when set)
    pub log_level: String,

    /// Emit JSON-formatted logs
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "connector-registry".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl ObservabilityConfig {
    /// Create ObservabilityConfig from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            service_name: std::env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            json_logs: std::env::var("LOG_JSON")
                .map(|s| s.to_lowercase() == "true" || s == "1")
                .unwrap_or(defaults.json_logs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_server_config_socket_address() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_address(), "0.0.0.0:50051");
    }

    #[test]
    fn test_non_postgres_url_rejected() {
        let config = AppConfig {
            database: DatabaseConfig {
                url: "sqlite://./connectors.db".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_database_config_timeouts() {
        let config = DatabaseConfig { idle_timeout_seconds: 0, ..Default::default() };
        assert!(config.idle_timeout().is_none());
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_secrets_backend_default_is_vault() {
        assert_eq!(SecretsBackend::default(), SecretsBackend::Vault);
    }
}
