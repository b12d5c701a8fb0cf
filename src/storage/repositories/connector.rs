//! Connector repository: parameterized CRUD over the `connectors` table.
//!
//! The registry consumes this module through the [`ConnectorStore`] and
//! [`ConnectorTx`] traits so consistency logic can be tested against
//! in-memory fakes. [`SqlxConnectorStore`] is the PostgreSQL implementation.
//!
//! The table holds only non-secret attributes; `id` and the timestamps are
//! assigned by the database at insert time.

use crate::errors::{RegistryError, Result};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::instrument;

/// Database row structure for connectors (non-secret attributes only)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ConnectorRow {
    pub id: String,
    pub workspace_id: String,
    pub default_channel_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the caller when creating a connector row.
/// `id`, `created_at` and `updated_at` are generated by the store.
#[derive(Debug, Clone)]
pub struct NewConnector {
    pub workspace_id: String,
    pub default_channel_id: String,
}

/// Relational store contract consumed by the registry.
#[async_trait]
pub trait ConnectorStore: Send + Sync {
    /// Open a transaction for mutating operations.
    async fn begin(&self) -> Result<Box<dyn ConnectorTx>>;

    /// Fetch a single row by id. Fails with `NotFound` if no row matches.
    async fn select_by_id(&self, id: &str) -> Result<ConnectorRow>;

    /// Fetch all rows in one query.
    async fn select_all(&self) -> Result<Vec<ConnectorRow>>;
}

/// Transaction handle over the connector table.
///
/// Dropping an uncommitted transaction rolls it back; explicit `rollback`
/// exists so callers can surface rollback failures. Rollback after commit is
/// impossible by construction (both consume the handle).
#[async_trait]
pub trait ConnectorTx: Send {
    /// Insert a row and return it with the store-generated id and timestamps.
    async fn insert_connector(&mut self, new: &NewConnector) -> Result<ConnectorRow>;

    /// Delete a row by id, returning the number of rows affected.
    async fn delete_connector(&mut self, id: &str) -> Result<u64>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// PostgreSQL-backed connector store.
#[derive(Clone)]
pub struct SqlxConnectorStore {
    pool: DbPool,
}

impl SqlxConnectorStore {
    /// Create a new connector store over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl std::fmt::Debug for SqlxConnectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlxConnectorStore").field("pool", &"[DbPool]").finish()
    }
}

#[async_trait]
impl ConnectorStore for SqlxConnectorStore {
    #[instrument(skip(self), name = "db_begin_tx")]
    async fn begin(&self) -> Result<Box<dyn ConnectorTx>> {
        let tx = self.pool.begin().await.map_err(|e| RegistryError::Database {
            source: e,
            context: "Failed to begin connector transaction".to_string(),
        })?;

        Ok(Box::new(SqlxConnectorTx { tx }))
    }

    #[instrument(skip(self), fields(connector_id = %id), name = "db_get_connector_by_id")]
    async fn select_by_id(&self, id: &str) -> Result<ConnectorRow> {
        let row = sqlx::query_as::<_, ConnectorRow>(
            "SELECT id, workspace_id, default_channel_id, created_at, updated_at \
             FROM connectors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, connector_id = %id, "Failed to get connector by ID");
            RegistryError::Database {
                source: e,
                context: format!("Failed to get connector with ID '{}'", id),
            }
        })?;

        row.ok_or_else(|| RegistryError::not_found("Connector", id))
    }

    #[instrument(skip(self), name = "db_list_connectors")]
    async fn select_all(&self) -> Result<Vec<ConnectorRow>> {
        sqlx::query_as::<_, ConnectorRow>(
            "SELECT id, workspace_id, default_channel_id, created_at, updated_at \
             FROM connectors ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list connectors");
            RegistryError::Database { source: e, context: "Failed to list connectors".to_string() }
        })
    }
}

/// PostgreSQL transaction over the connector table.
pub struct SqlxConnectorTx {
    tx: sqlx::Transaction<'static, sqlx::Postgres>,
}

#[async_trait]
impl ConnectorTx for SqlxConnectorTx {
    async fn insert_connector(&mut self, new: &NewConnector) -> Result<ConnectorRow> {
        let row = sqlx::query_as::<_, ConnectorRow>(
            "INSERT INTO connectors (workspace_id, default_channel_id) \
             VALUES ($1, $2) \
             RETURNING id, workspace_id, default_channel_id, created_at, updated_at",
        )
        .bind(&new.workspace_id)
        .bind(&new.default_channel_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, workspace_id = %new.workspace_id, "Failed to insert connector");
            RegistryError::Database {
                source: e,
                context: format!(
                    "Failed to insert connector for workspace '{}'",
                    new.workspace_id
                ),
            }
        })?;

        tracing::info!(
            connector_id = %row.id,
            workspace_id = %row.workspace_id,
            "Inserted connector row"
        );

        Ok(row)
    }

    async fn delete_connector(&mut self, id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM connectors WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, connector_id = %id, "Failed to delete connector");
                RegistryError::Database {
                    source: e,
                    context: format!("Failed to delete connector '{}'", id),
                }
            })?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(|e| RegistryError::Database {
            source: e,
            context: "Failed to commit connector transaction".to_string(),
        })
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(|e| RegistryError::Database {
            source: e,
            context: "Failed to roll back connector transaction".to_string(),
        })
    }
}
