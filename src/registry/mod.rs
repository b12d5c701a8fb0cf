//! # Connector Registry
//!
//! Core orchestrator over the relational store and the secret store.
//!
//! Every connector has two halves: a relational row (non-secret attributes)
//! and a secret (the bot token, keyed by the row's id). The registry keeps
//! the cross-store invariant (row exists iff secret exists) across save,
//! read, and delete:
//!
//! - `save` creates the secret inside the relational transaction window and
//!   rolls the row back if secret creation fails, so no orphan row can be
//!   observed. The one residual gap is a commit failure *after* the secret
//!   was created: the secret is then orphaned. That window is accepted and
//!   logged rather than silently repaired.
//! - `delete` removes the secret inside the transaction window and rolls the
//!   row delete back if secret deletion fails, so row and secret disappear
//!   together or not at all.
//! - `get_all` hydrates secrets with a fan-out/fan-in barrier: one future per
//!   row, joined before returning. A per-row fetch failure degrades that
//!   row's token to empty instead of failing the call. This is deliberately
//!   asymmetric with `get_by_id`, where a missing secret is fatal.
//!
//! The registry performs no input validation (the service facade owns that)
//! and no retries (a transport/caller concern).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::instrument;

use crate::errors::{RegistryError, Result};
use crate::secrets::{SecretString, SecretsClient};
use crate::storage::{ConnectorRow, ConnectorStore, ConnectorTx, NewConnector};

/// A fully hydrated connector: relational attributes plus the secret token.
#[derive(Debug, Clone)]
pub struct Connector {
    pub id: String,
    pub workspace_id: String,
    pub default_channel_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bot token from the secret store. Empty when bulk hydration degraded
    /// for this row (see [`ConnectorRegistry::get_all`]).
    pub token: SecretString,
}

impl Connector {
    fn from_row(row: ConnectorRow, token: SecretString) -> Self {
        Self {
            id: row.id,
            workspace_id: row.workspace_id,
            default_channel_id: row.default_channel_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            token,
        }
    }
}

/// Registry of connector records over a relational store and a secret store.
///
/// Both clients are injected, process-owned singletons shared by many
/// concurrent calls; each operation's mutations are scoped to a single
/// connector id, so no registry-level locking exists.
pub struct ConnectorRegistry {
    store: Arc<dyn ConnectorStore>,
    secrets: Arc<dyn SecretsClient>,
}

impl ConnectorRegistry {
    /// Create a registry over the given store clients.
    pub fn new(store: Arc<dyn ConnectorStore>, secrets: Arc<dyn SecretsClient>) -> Self {
        Self { store, secrets }
    }

    /// Create a connector: insert the row and store its token, atomically
    /// from the caller's point of view.
    ///
    /// The secret is created inside the relational transaction window; if
    /// secret creation fails the row insert is rolled back, so a failed save
    /// never leaves a retrievable row. Returns the store-generated id.
    #[instrument(skip(self, new, token), fields(workspace_id = %new.workspace_id), name = "registry_save")]
    pub async fn save(&self, new: NewConnector, token: SecretString) -> Result<String> {
        let mut tx = self.store.begin().await?;

        let row = match tx.insert_connector(&new).await {
            Ok(row) => row,
            Err(e) => {
                rollback_or_log(tx, "save").await;
                return Err(e);
            }
        };

        if let Err(e) = self.secrets.create_secret(&row.id, &token).await {
            tracing::error!(
                error = %e,
                connector_id = %row.id,
                "Save: secret creation failed, rolling back connector row"
            );
            tx.rollback().await?;
            return Err(RegistryError::secret_backend(
                e,
                format!("Save: failed to create secret for connector '{}'", row.id),
            ));
        }

        if let Err(e) = tx.commit().await {
            // Accepted consistency gap: the secret was already created and is
            // now orphaned. Surfaced in the log with the key so an operator
            // (or a future reconciliation sweep) can clean it up.
            tracing::error!(
                error = %e,
                connector_id = %row.id,
                "Save: relational commit failed after secret creation; secret is orphaned"
            );
            return Err(e);
        }

        tracing::info!(connector_id = %row.id, workspace_id = %row.workspace_id, "Saved connector");
        Ok(row.id)
    }

    /// Fetch a single connector with its token.
    ///
    /// Fails with `NotFound` if no row matches, and with an internal-class
    /// error if the row exists but its secret cannot be fetched; a row
    /// without a retrievable secret is an error condition, not a partial
    /// result.
    #[instrument(skip(self), fields(connector_id = %id), name = "registry_get_by_id")]
    pub async fn get_by_id(&self, id: &str) -> Result<Connector> {
        let row = self.store.select_by_id(id).await?;

        let token = self.secrets.get_secret(&row.id).await.map_err(|e| {
            tracing::error!(error = %e, connector_id = %row.id, "GetByID: failed to fetch secret");
            RegistryError::secret_backend(
                e,
                format!("GetByID: failed to fetch secret for connector '{}'", row.id),
            )
        })?;

        Ok(Connector::from_row(row, token))
    }

    /// Fetch all connectors, hydrating each row's token concurrently.
    ///
    /// One fetch future per row, no ordering guarantee between fetches, and
    /// the call blocks until every fetch finished. A per-row failure is
    /// logged and degrades that row's token to empty; it never aborts the
    /// call. Concurrency equals the row count of this call; each future is
    /// a single in-flight secret fetch, not a queued task.
    #[instrument(skip(self), name = "registry_get_all")]
    pub async fn get_all(&self) -> Result<Vec<Connector>> {
        let rows = self.store.select_all().await?;

        let hydrations = rows.into_iter().map(|row| {
            let secrets = Arc::clone(&self.secrets);
            async move {
                let token = match secrets.get_secret(&row.id).await {
                    Ok(token) => token,
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            connector_id = %row.id,
                            "GetAll: secret fetch failed, returning connector with empty token"
                        );
                        SecretString::default()
                    }
                };
                Connector::from_row(row, token)
            }
        });

        Ok(join_all(hydrations).await)
    }

    /// Delete a connector: remove the row and its secret together.
    ///
    /// Fails with `NotFound` if no row matched. If secret deletion fails the
    /// row delete is rolled back, restoring the cross-store invariant, and
    /// an internal-class error is returned.
    #[instrument(skip(self), fields(connector_id = %id), name = "registry_delete")]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut tx = self.store.begin().await?;

        let rows_affected = match tx.delete_connector(id).await {
            Ok(n) => n,
            Err(e) => {
                rollback_or_log(tx, "delete").await;
                return Err(e);
            }
        };

        if rows_affected == 0 {
            tx.rollback().await?;
            return Err(RegistryError::not_found("Connector", id));
        }

        if let Err(e) = self.secrets.delete_secret(id).await {
            tracing::error!(
                error = %e,
                connector_id = %id,
                "Delete: secret deletion failed, rolling back row delete"
            );
            tx.rollback().await?;
            return Err(RegistryError::secret_backend(
                e,
                format!("Delete: failed to delete secret for connector '{}'", id),
            ));
        }

        tx.commit().await?;

        tracing::info!(connector_id = %id, "Deleted connector");
        Ok(())
    }
}

/// Best-effort rollback when the operation is already failing; the original
/// error is the one the caller needs to see.
async fn rollback_or_log(tx: Box<dyn ConnectorTx>, operation: &str) {
    if let Err(e) = tx.rollback().await {
        tracing::error!(error = %e, operation = %operation, "Rollback failed");
    }
}
