//! # Connector Service
//!
//! Request-level facade in front of the registry. Owns input validation for
//! every operation; the registry below assumes its inputs are well-formed.
//!
//! Validation collects every missing required field before failing, so a
//! caller that omitted several fields learns about all of them in one round
//! trip. Field names in violation messages use the wire-level camelCase form.

use std::sync::Arc;

use tracing::instrument;

use crate::errors::{FieldViolation, RegistryError, Result};
use crate::registry::{Connector, ConnectorRegistry};
use crate::secrets::SecretString;
use crate::storage::NewConnector;

/// Validated parameters for creating a connector.
#[derive(Debug, Clone)]
pub struct CreateConnectorRequest {
    pub workspace_id: String,
    pub default_channel_id: String,
    pub token: String,
}

/// Accumulates required-field violations across a whole request.
#[derive(Debug, Default)]
struct FieldViolations {
    violations: Vec<FieldViolation>,
}

impl FieldViolations {
    fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.violations.push(FieldViolation::new(field, format!("{} is required", field)));
        }
    }

    fn into_result(self) -> Result<()> {
        if self.violations.is_empty() {
            return Ok(());
        }

        let message = self
            .violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        Err(RegistryError::validation_fields(message, self.violations))
    }
}

/// Service layer for connector lifecycle operations.
pub struct ConnectorService {
    registry: Arc<ConnectorRegistry>,
}

impl ConnectorService {
    /// Create a service over the given registry.
    pub fn new(registry: Arc<ConnectorRegistry>) -> Self {
        Self { registry }
    }

    /// Validate and create a connector; returns the store-generated id.
    #[instrument(skip(self, request), fields(workspace_id = %request.workspace_id), name = "service_create_connector")]
    pub async fn create_connector(&self, request: CreateConnectorRequest) -> Result<String> {
        let mut violations = FieldViolations::default();
        violations.require("workspaceId", &request.workspace_id);
        violations.require("defaultChannelId", &request.default_channel_id);
        violations.require("token", &request.token);
        violations.into_result()?;

        let new = NewConnector {
            workspace_id: request.workspace_id,
            default_channel_id: request.default_channel_id,
        };

        self.registry.save(new, SecretString::from(request.token)).await
    }

    /// Fetch a single connector by id, token included.
    #[instrument(skip(self), fields(connector_id = %id), name = "service_get_connector")]
    pub async fn get_connector(&self, id: &str) -> Result<Connector> {
        let mut violations = FieldViolations::default();
        violations.require("id", id);
        violations.into_result()?;

        self.registry.get_by_id(id).await
    }

    /// Fetch all connectors.
    #[instrument(skip(self), name = "service_list_connectors")]
    pub async fn list_connectors(&self) -> Result<Vec<Connector>> {
        self.registry.get_all().await
    }

    /// Delete a connector and its token.
    #[instrument(skip(self), fields(connector_id = %id), name = "service_delete_connector")]
    pub async fn delete_connector(&self, id: &str) -> Result<()> {
        let mut violations = FieldViolations::default();
        violations.require("id", id);
        violations.into_result()?;

        self.registry.delete(id).await
    }
}
