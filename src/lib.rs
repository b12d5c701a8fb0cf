//! # Connector Registry
//!
//! A tenant-scoped registry of chat-platform connectors served over gRPC.
//! Each connector pairs non-secret attributes (workspace, default channel)
//! stored in PostgreSQL with a bot token held in a separate secret store,
//! and the registry keeps the two stores consistent across create, read,
//! and delete.
//!
//! ## Architecture
//!
//! - **config**: Environment-driven configuration
//! - **errors**: Error taxonomy and gRPC status mapping
//! - **grpc**: Generated protobuf types, handler, server bootstrap
//! - **observability**: Tracing subscriber setup
//! - **registry**: Cross-store consistency orchestration
//! - **secrets**: Secret store client trait and backends
//! - **service**: Request validation facade
//! - **storage**: PostgreSQL pool and connector repository

pub mod config;
pub mod errors;
pub mod grpc;
pub mod observability;
pub mod registry;
pub mod secrets;
pub mod service;
pub mod storage;

pub use config::AppConfig;
pub use errors::{FieldViolation, RegistryError, Result};
pub use registry::{Connector, ConnectorRegistry};
pub use service::ConnectorService;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "connector-registry";
