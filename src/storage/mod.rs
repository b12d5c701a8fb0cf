//! # Storage and Persistence
//!
//! Database connectivity and the persistence layer for connector rows.

pub mod pool;
pub mod repositories;

pub use crate::config::DatabaseConfig;
pub use pool::{create_pool, DbPool};
pub use repositories::{
    ConnectorRow, ConnectorStore, ConnectorTx, NewConnector, SqlxConnectorStore,
};

use crate::errors::{RegistryError, Result};

/// Check database connectivity
pub async fn check_connection(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(|e| RegistryError::Database {
        source: e,
        context: "Database connectivity check failed".to_string(),
    })?;

    Ok(())
}
