//! Core secret store trait.

use async_trait::async_trait;

use super::error::Result;
use super::types::SecretString;

/// Trait for secret-management backends.
///
/// Secrets are keyed by connector id; no versioning or rotation semantics are
/// required by the registry. Implementations must never log secret values.
#[async_trait]
pub trait SecretsClient: Send + Sync {
    /// Create a secret under the given key.
    ///
    /// # Errors
    ///
    /// - [`SecretsError::InvalidKey`] if the key format is invalid
    /// - [`SecretsError::BackendError`] if storage fails
    ///
    /// [`SecretsError::InvalidKey`]: super::error::SecretsError::InvalidKey
    /// [`SecretsError::BackendError`]: super::error::SecretsError::BackendError
    async fn create_secret(&self, key: &str, value: &SecretString) -> Result<()>;

    /// Retrieve a secret value by key.
    ///
    /// # Errors
    ///
    /// - [`SecretsError::NotFound`] if the secret doesn't exist
    /// - [`SecretsError::ConnectionFailed`] if the backend is unreachable
    ///
    /// [`SecretsError::NotFound`]: super::error::SecretsError::NotFound
    /// [`SecretsError::ConnectionFailed`]: super::error::SecretsError::ConnectionFailed
    async fn get_secret(&self, key: &str) -> Result<SecretString>;

    /// Delete a secret from the backend.
    ///
    /// # Errors
    ///
    /// - [`SecretsError::BackendError`] if deletion fails
    ///
    /// [`SecretsError::BackendError`]: super::error::SecretsError::BackendError
    async fn delete_secret(&self, key: &str) -> Result<()>;
}
