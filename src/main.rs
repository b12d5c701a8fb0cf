//! Connector registry service entry point.

use std::sync::Arc;

use connector_registry::config::{AppConfig, SecretsBackend};
use connector_registry::errors::{RegistryError, Result};
use connector_registry::grpc::start_grpc_server;
use connector_registry::observability::init_tracing;
use connector_registry::registry::ConnectorRegistry;
use connector_registry::secrets::{InMemorySecretsClient, SecretsClient, VaultSecretsClient};
use connector_registry::service::ConnectorService;
use connector_registry::storage::{self, SqlxConnectorStore};
use connector_registry::{APP_NAME, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; the environment itself may carry everything.
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    init_tracing(&config.observability)?;

    tracing::info!(app = APP_NAME, version = VERSION, "Starting connector registry");

    let pool = storage::create_pool(&config.database).await?;
    storage::check_connection(&pool).await?;

    let secrets: Arc<dyn SecretsClient> = match config.secrets.backend {
        SecretsBackend::Vault => {
            let client =
                VaultSecretsClient::new(config.secrets.vault.clone()).await.map_err(|e| {
                    RegistryError::secret_backend(e, "Failed to initialize Vault secret store")
                })?;
            Arc::new(client)
        }
        SecretsBackend::Memory => {
            tracing::warn!("Using in-memory secret store; secrets will not survive a restart");
            Arc::new(InMemorySecretsClient::new())
        }
    };

    let store = Arc::new(SqlxConnectorStore::new(pool));
    let registry = Arc::new(ConnectorRegistry::new(store, secrets));
    let service = Arc::new(ConnectorService::new(registry));

    start_grpc_server(&config.server, service).await
}
