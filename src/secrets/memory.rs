//! In-memory secret store backend.
//!
//! Keeps secrets in a process-local map. Intended for development and tests
//! only - nothing is encrypted and nothing survives a restart. Use the Vault
//! backend in production.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::client::SecretsClient;
use super::error::{Result, SecretsError};
use super::types::SecretString;

/// Process-local secret store (development and tests only).
#[derive(Debug, Default)]
pub struct InMemorySecretsClient {
    secrets: Mutex<HashMap<String, String>>,
}

impl InMemorySecretsClient {
    /// Creates an empty in-memory secret store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a secret exists under the given key.
    pub fn contains(&self, key: &str) -> bool {
        self.secrets.lock().expect("secrets lock poisoned").contains_key(key)
    }
}

#[async_trait]
impl SecretsClient for InMemorySecretsClient {
    async fn create_secret(&self, key: &str, value: &SecretString) -> Result<()> {
        if key.is_empty() {
            return Err(SecretsError::invalid_key(key, "key cannot be empty"));
        }
        self.secrets
            .lock()
            .expect("secrets lock poisoned")
            .insert(key.to_string(), value.expose_secret().to_string());
        Ok(())
    }

    async fn get_secret(&self, key: &str) -> Result<SecretString> {
        self.secrets
            .lock()
            .expect("secrets lock poisoned")
            .get(key)
            .map(SecretString::new)
            .ok_or_else(|| SecretsError::not_found(key))
    }

    async fn delete_secret(&self, key: &str) -> Result<()> {
        self.secrets.lock().expect("secrets lock poisoned").remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_get_delete_roundtrip() {
        let client = InMemorySecretsClient::new();
        client.create_secret("c-1", &SecretString::new("tok-A")).await.unwrap();

        let value = client.get_secret("c-1").await.unwrap();
        assert_eq!(value.expose_secret(), "tok-A");

        client.delete_secret("c-1").await.unwrap();
        assert!(matches!(client.get_secret("c-1").await, Err(SecretsError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let client = InMemorySecretsClient::new();
        assert!(matches!(client.get_secret("missing").await, Err(SecretsError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_key() {
        let client = InMemorySecretsClient::new();
        let result = client.create_secret("", &SecretString::new("tok")).await;
        assert!(matches!(result, Err(SecretsError::InvalidKey { .. })));
    }
}
