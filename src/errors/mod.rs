//! # Error Handling
//!
//! Error types for the connector registry, built with `thiserror`.
//!
//! The registry exposes a small taxonomy to its callers: `NotFound`,
//! `Conflict` (reserved for future uniqueness constraints), `Validation`
//! (enforced by the service facade, never by the registry itself), and the
//! internal class (`Database`, `SecretBackend`, `Internal`, `Config`,
//! `Transport`). The gRPC handler maps this taxonomy to status codes via
//! [`RegistryError::grpc_code`].

use crate::secrets::SecretsError;

/// Custom result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// A single invalid request field. Carried on [`RegistryError::Validation`]
/// so the transport layer can attach per-field detail to its status payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub description: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self { field: field.into(), description: description.into() }
    }
}

/// Main error type for the connector registry service
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    /// Resource not found errors
    #[error("Resource not found: {resource_type} with ID '{id}'")]
    NotFound { resource_type: String, id: String },

    /// Resource conflict errors (e.g., already exists).
    /// Reserved for future uniqueness constraints; not currently constructed
    /// by any registry operation.
    #[error("Resource conflict: {message}")]
    Conflict { message: String, resource_type: String },

    /// Validation errors (caller-supplied required field missing or invalid)
    #[error("Validation error: {message}")]
    Validation { message: String, violations: Vec<FieldViolation> },

    /// Relational store errors
    #[error("Database error: {context}")]
    Database {
        #[source]
        source: sqlx::Error,
        context: String,
    },

    /// Secret store errors
    #[error("Secret backend error: {context}")]
    SecretBackend {
        #[source]
        source: SecretsError,
        context: String,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Network transport errors (gRPC serve/bind failures)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl RegistryError {
    /// Create a not found error
    pub fn not_found<R: Into<String>, I: Into<String>>(resource_type: R, id: I) -> Self {
        Self::NotFound { resource_type: resource_type.into(), id: id.into() }
    }

    /// Create a conflict error
    pub fn conflict<M: Into<String>, R: Into<String>>(message: M, resource_type: R) -> Self {
        Self::Conflict { message: message.into(), resource_type: resource_type.into() }
    }

    /// Create a validation error with no field detail
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), violations: Vec::new() }
    }

    /// Create a validation error for a single field
    pub fn validation_field<F: Into<String>, D: Into<String>>(field: F, description: D) -> Self {
        let description = description.into();
        Self::Validation {
            message: description.clone(),
            violations: vec![FieldViolation { field: field.into(), description }],
        }
    }

    /// Create a validation error carrying multiple field violations
    pub fn validation_fields<S: Into<String>>(
        message: S,
        violations: Vec<FieldViolation>,
    ) -> Self {
        Self::Validation { message: message.into(), violations }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Wrap a secret-backend failure with operation context
    pub fn secret_backend<S: Into<String>>(source: SecretsError, context: S) -> Self {
        Self::SecretBackend { source, context: context.into() }
    }

    /// The gRPC status code this error maps to. Pure function of the
    /// taxonomy: not-found → NOT_FOUND, validation → INVALID_ARGUMENT,
    /// conflict → ALREADY_EXISTS, everything else → INTERNAL.
    pub fn grpc_code(&self) -> tonic::Code {
        match self {
            RegistryError::NotFound { .. } => tonic::Code::NotFound,
            RegistryError::Validation { .. } => tonic::Code::InvalidArgument,
            RegistryError::Conflict { .. } => tonic::Code::AlreadyExists,
            RegistryError::Database { .. }
            | RegistryError::SecretBackend { .. }
            | RegistryError::Config { .. }
            | RegistryError::Transport { .. }
            | RegistryError::Internal { .. } => tonic::Code::Internal,
        }
    }
}

impl From<validator::ValidationErrors> for RegistryError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let violations: Vec<FieldViolation> = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                FieldViolation::new(field.to_string(), messages.join(", "))
            })
            .collect();

        let message = violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.description))
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation_fields(format!("Validation failed: {}", message), violations)
    }
}
