//! Test doubles for the registry's two stores.
//!
//! `MemConnectorStore` mimics the transactional relational store: mutations
//! buffer inside `MemConnectorTx` and only reach the shared state on commit,
//! so rollback tests can observe that nothing changed. `FlakySecrets` wraps
//! the in-memory secret client with per-operation fault injection.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use connector_registry::errors::{RegistryError, Result};
use connector_registry::secrets::{InMemorySecretsClient, SecretString, SecretsClient};
use connector_registry::storage::{ConnectorRow, ConnectorStore, ConnectorTx, NewConnector};

/// In-memory connector store with injectable failures.
#[derive(Default)]
pub struct MemConnectorStore {
    rows: Arc<Mutex<Vec<ConnectorRow>>>,
    next_id: AtomicU64,
    pub fail_insert: AtomicBool,
    pub fail_commit: AtomicBool,
}

impl MemConnectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed rows.
    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ConnectorStore for MemConnectorStore {
    async fn begin(&self) -> Result<Box<dyn ConnectorTx>> {
        Ok(Box::new(MemConnectorTx {
            rows: Arc::clone(&self.rows),
            pending_inserts: Vec::new(),
            pending_deletes: Vec::new(),
            next_id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            fail_insert: self.fail_insert.load(Ordering::SeqCst),
            fail_commit: self.fail_commit.load(Ordering::SeqCst),
        }))
    }

    async fn select_by_id(&self, id: &str) -> Result<ConnectorRow> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or_else(|| RegistryError::not_found("Connector", id))
    }

    async fn select_all(&self) -> Result<Vec<ConnectorRow>> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

struct MemConnectorTx {
    rows: Arc<Mutex<Vec<ConnectorRow>>>,
    pending_inserts: Vec<ConnectorRow>,
    pending_deletes: Vec<String>,
    next_id: u64,
    fail_insert: bool,
    fail_commit: bool,
}

#[async_trait]
impl ConnectorTx for MemConnectorTx {
    async fn insert_connector(&mut self, new: &NewConnector) -> Result<ConnectorRow> {
        if self.fail_insert {
            return Err(RegistryError::internal("injected insert failure"));
        }

        let now = Utc::now();
        let row = ConnectorRow {
            id: format!("c-{}", self.next_id),
            workspace_id: new.workspace_id.clone(),
            default_channel_id: new.default_channel_id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.pending_inserts.push(row.clone());
        Ok(row)
    }

    async fn delete_connector(&mut self, id: &str) -> Result<u64> {
        let exists = self.rows.lock().unwrap().iter().any(|row| row.id == id);
        if exists {
            self.pending_deletes.push(id.to_string());
            Ok(1)
        } else {
            Ok(0)
        }
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        if self.fail_commit {
            return Err(RegistryError::internal("injected commit failure"));
        }

        let mut rows = self.rows.lock().unwrap();
        rows.retain(|row| !self.pending_deletes.contains(&row.id));
        rows.extend(self.pending_inserts);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        // Buffered mutations are simply dropped.
        Ok(())
    }
}

/// Secret store with injectable failures around an in-memory backend.
#[derive(Default)]
pub struct FlakySecrets {
    inner: InMemorySecretsClient,
    pub fail_create: AtomicBool,
    pub fail_delete: AtomicBool,
    fail_get_keys: Mutex<HashSet<String>>,
}

impl FlakySecrets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `get_secret` fail for the given key only.
    pub fn fail_get_for(&self, key: &str) {
        self.fail_get_keys.lock().unwrap().insert(key.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }
}

#[async_trait]
impl SecretsClient for FlakySecrets {
    async fn create_secret(
        &self,
        key: &str,
        value: &SecretString,
    ) -> connector_registry::secrets::Result<()> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(connector_registry::secrets::SecretsError::backend_error(
                "injected create failure",
            ));
        }
        self.inner.create_secret(key, value).await
    }

    async fn get_secret(&self, key: &str) -> connector_registry::secrets::Result<SecretString> {
        if self.fail_get_keys.lock().unwrap().contains(key) {
            return Err(connector_registry::secrets::SecretsError::backend_error(
                "injected get failure",
            ));
        }
        self.inner.get_secret(key).await
    }

    async fn delete_secret(&self, key: &str) -> connector_registry::secrets::Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(connector_registry::secrets::SecretsError::backend_error(
                "injected delete failure",
            ));
        }
        self.inner.delete_secret(key).await
    }
}
