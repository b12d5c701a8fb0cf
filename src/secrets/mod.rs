//! Secret store abstraction.
//!
//! Connector bot tokens never touch the relational store; they live in an
//! external secret-management backend, keyed by connector id. The
//! [`SecretsClient`] trait is the backend-agnostic interface the registry
//! consumes:
//!
//! - **create_secret**: store a token under a connector id
//! - **get_secret**: retrieve a token
//! - **delete_secret**: remove a token
//!
//! # Supported backends
//!
//! - **HashiCorp Vault** ([`VaultSecretsClient`]): KV v2 engine, production
//! - **In-memory** ([`InMemorySecretsClient`]): development and tests only
//!
//! # Security considerations
//!
//! - Secret values are wrapped in [`SecretString`] and never logged
//! - Backends must not expose values in error messages

pub mod client;
pub mod error;
pub mod memory;
pub mod types;
pub mod vault;

pub use client::SecretsClient;
pub use error::{Result, SecretsError};
pub use memory::InMemorySecretsClient;
pub use types::SecretString;
pub use vault::{VaultConfig, VaultSecretsClient};
