//! # Configuration Management
//!
//! Environment-driven configuration for the connector registry service.

pub mod settings;

pub use settings::{
    AppConfig, DatabaseConfig, ObservabilityConfig, SecretsBackend, SecretsConfig, ServerConfig,
};
