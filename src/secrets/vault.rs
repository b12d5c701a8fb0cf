//! HashiCorp Vault secret store backend.
//!
//! Stores connector bot tokens in Vault's KV v2 secrets engine, keyed by
//! connector id. Each secret is written as a map with a single `value` field.
//!
//! # Security
//!
//! - All communication should use TLS in production
//! - Tokens are never logged
//! - KV v2 provides encryption at rest and versioning in Vault itself

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};
use vaultrs::error::ClientError;
use vaultrs::kv2;

use super::client::SecretsClient;
use super::error::{Result, SecretsError};
use super::types::SecretString;

/// Configuration for connecting to Vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault server address (HTTPS recommended)
    pub address: String,

    /// Authentication token
    pub token: Option<String>,

    /// Optional namespace for multi-tenancy
    pub namespace: Option<String>,

    /// KV v2 mount path
    pub mount_path: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:8200".to_string(),
            token: None,
            namespace: None,
            mount_path: "secret".to_string(),
        }
    }
}

/// Vault-backed secret store for connector tokens.
pub struct VaultSecretsClient {
    client: VaultClient,
    mount_path: String,
}

impl VaultSecretsClient {
    /// Connect to Vault and verify the server is reachable.
    pub async fn new(config: VaultConfig) -> Result<Self> {
        if config.address.is_empty() {
            return Err(SecretsError::config_error("Vault address cannot be empty"));
        }

        let mut settings_builder = VaultClientSettingsBuilder::default();
        settings_builder.address(&config.address);

        if let Some(ref token) = config.token {
            settings_builder.token(token);
        }

        if let Some(namespace) = config.namespace {
            settings_builder.namespace(Some(namespace));
        }

        let settings = settings_builder.build().map_err(|e| {
            SecretsError::config_error(format!("Invalid Vault configuration: {}", e))
        })?;

        let client = VaultClient::new(settings).map_err(|e| {
            SecretsError::connection_failed(format!("Failed to create Vault client: {}", e))
        })?;

        match vaultrs::sys::health(&client).await {
            Ok(_) => {
                tracing::info!(address = %config.address, "Successfully connected to Vault");
            }
            Err(e) => {
                tracing::error!(error = %e, address = %config.address, "Failed to connect to Vault");
                return Err(SecretsError::connection_failed(format!(
                    "Vault health check failed: {}",
                    e
                )));
            }
        }

        Ok(Self { client, mount_path: config.mount_path })
    }
}

#[async_trait]
impl SecretsClient for VaultSecretsClient {
    async fn create_secret(&self, key: &str, value: &SecretString) -> Result<()> {
        validate_secret_key(key)?;

        // Store the secret as a map with a single "value" field.
        let mut data = HashMap::new();
        data.insert("value".to_string(), value.expose_secret().to_string());

        kv2::set(&self.client, &self.mount_path, key, &data).await.map_err(|e| {
            tracing::error!(error = %e, key = %key, "Failed to write secret to Vault");
            SecretsError::backend_error(format!("Failed to store secret '{}': {}", key, e))
        })?;

        tracing::debug!(key = %key, mount_path = %self.mount_path, "Stored secret in Vault");
        Ok(())
    }

    async fn get_secret(&self, key: &str) -> Result<SecretString> {
        validate_secret_key(key)?;

        let secret: HashMap<String, String> =
            kv2::read(&self.client, &self.mount_path, key).await.map_err(|e| {
                tracing::error!(error = %e, key = %key, "Failed to read secret from Vault");
                read_error(key, e)
            })?;

        secret.get("value").map(SecretString::new).ok_or_else(|| {
            SecretsError::backend_error(format!("Secret '{}' has no 'value' field", key))
        })
    }

    async fn delete_secret(&self, key: &str) -> Result<()> {
        validate_secret_key(key)?;

        // Delete all versions of the secret (metadata delete).
        kv2::delete_metadata(&self.client, &self.mount_path, key).await.map_err(|e| {
            tracing::error!(error = %e, key = %key, "Failed to delete secret from Vault");
            SecretsError::backend_error(format!("Failed to delete secret '{}': {}", key, e))
        })?;

        tracing::debug!(key = %key, mount_path = %self.mount_path, "Deleted secret from Vault");
        Ok(())
    }
}

/// Maps a Vault read failure onto the secrets taxonomy. Only an HTTP 404
/// from Vault means the secret is missing; everything else (connectivity,
/// permissions, sealed server) is a backend error.
fn read_error(key: &str, err: ClientError) -> SecretsError {
    match err {
        ClientError::APIError { code: 404, .. } => SecretsError::not_found(key),
        other => {
            SecretsError::backend_error(format!("Failed to read secret '{}': {}", key, other))
        }
    }
}

/// Validates a secret key before it is interpolated into a Vault path.
///
/// Rejects empty keys, keys longer than 128 characters, and keys containing
/// path separators or traversal sequences.
fn validate_secret_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(SecretsError::invalid_key(key, "key cannot be empty"));
    }

    if key.len() > 128 {
        return Err(SecretsError::invalid_key(
            key,
            format!("key exceeds maximum length of 128 characters (got {})", key.len()),
        ));
    }

    if key.contains('/') {
        return Err(SecretsError::invalid_key(key, "key cannot contain '/' (path separator)"));
    }

    if key.contains("..") {
        return Err(SecretsError::invalid_key(key, "key cannot contain '..' (path traversal)"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_config_default() {
        let config = VaultConfig::default();
        assert_eq!(config.address, "http://127.0.0.1:8200");
        assert_eq!(config.mount_path, "secret");
        assert!(config.token.is_none());
        assert!(config.namespace.is_none());
    }

    #[test]
    fn test_validate_secret_key_accepts_uuid_like_keys() {
        assert!(validate_secret_key("9b2f1f0e-40a1-4a6d-9f5d-1c2f3a4b5c6d").is_ok());
        assert!(validate_secret_key("connector-123").is_ok());
    }

    #[test]
    fn test_validate_secret_key_rejects_bad_keys() {
        assert!(validate_secret_key("").is_err());
        assert!(validate_secret_key("a/b").is_err());
        assert!(validate_secret_key("..").is_err());
        assert!(validate_secret_key(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_read_error_distinguishes_missing_from_backend_failure() {
        let err = read_error("c-1", ClientError::APIError { code: 404, errors: vec![] });
        assert!(matches!(err, SecretsError::NotFound { .. }));

        let err = read_error(
            "c-1",
            ClientError::APIError { code: 403, errors: vec!["permission denied".to_string()] },
        );
        assert!(matches!(err, SecretsError::BackendError { .. }));
    }

    #[tokio::test]
    async fn test_new_rejects_empty_address() {
        let config = VaultConfig { address: String::new(), ..Default::default() };
        let result = VaultSecretsClient::new(config).await;
        assert!(matches!(result, Err(SecretsError::ConfigError { .. })));
    }
}
