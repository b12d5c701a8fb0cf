//! # gRPC Surface
//!
//! Generated protobuf types, the handler mapping wire messages onto the
//! service facade, and the server bootstrap.

pub mod server;

pub use server::start_grpc_server;

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tonic_types::{ErrorDetails, StatusExt};
use tracing::instrument;

use crate::errors::RegistryError;
use crate::registry::Connector;
use crate::service::{ConnectorService, CreateConnectorRequest};

/// Generated protobuf and gRPC service types.
pub mod proto {
    pub mod connectors {
        pub mod v1 {
            tonic::include_proto!("connectors.v1");
        }
    }
}

use proto::connectors::v1::connector_service_server::ConnectorService as ConnectorServiceGrpc;
pub use proto::connectors::v1::connector_service_server::ConnectorServiceServer;

/// gRPC handler delegating to the service facade.
pub struct ConnectorsGrpcHandler {
    service: Arc<ConnectorService>,
}

impl ConnectorsGrpcHandler {
    pub fn new(service: Arc<ConnectorService>) -> Self {
        Self { service }
    }
}

impl From<RegistryError> for Status {
    fn from(error: RegistryError) -> Self {
        let code = error.grpc_code();

        // Validation failures carry structured per-field detail so callers
        // can act on each violated field without parsing the message.
        if let RegistryError::Validation { message, violations } = &error {
            if !violations.is_empty() {
                let mut details = ErrorDetails::new();
                for violation in violations {
                    details.add_bad_request_violation(&violation.field, &violation.description);
                }
                return Status::with_error_details(code, message.clone(), details);
            }
        }

        // Internal-class details stay in the logs; the wire gets the
        // taxonomy message only.
        Status::new(code, error.to_string())
    }
}

fn to_proto_timestamp(ts: chrono::DateTime<chrono::Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp { seconds: ts.timestamp(), nanos: ts.timestamp_subsec_nanos() as i32 }
}

impl From<Connector> for proto::connectors::v1::Connector {
    fn from(connector: Connector) -> Self {
        Self {
            id: connector.id,
            workspace_id: connector.workspace_id,
            default_channel_id: connector.default_channel_id,
            created_at: Some(to_proto_timestamp(connector.created_at)),
            updated_at: Some(to_proto_timestamp(connector.updated_at)),
            token: connector.token.into_inner(),
        }
    }
}

#[tonic::async_trait]
impl ConnectorServiceGrpc for ConnectorsGrpcHandler {
    #[instrument(skip(self, request), name = "grpc_create_connector")]
    async fn create_connector(
        &self,
        request: Request<proto::connectors::v1::CreateConnectorRequest>,
    ) -> Result<Response<proto::connectors::v1::CreateConnectorResponse>, Status> {
        let message = request.into_inner();

        let connector_id = self
            .service
            .create_connector(CreateConnectorRequest {
                workspace_id: message.workspace_id,
                default_channel_id: message.default_channel_id,
                token: message.token,
            })
            .await?;

        Ok(Response::new(proto::connectors::v1::CreateConnectorResponse { connector_id }))
    }

    #[instrument(skip(self, request), name = "grpc_get_connector")]
    async fn get_connector(
        &self,
        request: Request<proto::connectors::v1::GetConnectorRequest>,
    ) -> Result<Response<proto::connectors::v1::GetConnectorResponse>, Status> {
        let message = request.into_inner();

        let connector = self.service.get_connector(&message.connector_id).await?;

        Ok(Response::new(proto::connectors::v1::GetConnectorResponse {
            connector: Some(connector.into()),
        }))
    }

    #[instrument(skip(self, _request), name = "grpc_list_connectors")]
    async fn list_connectors(
        &self,
        _request: Request<proto::connectors::v1::ListConnectorsRequest>,
    ) -> Result<Response<proto::connectors::v1::ListConnectorsResponse>, Status> {
        let connectors = self.service.list_connectors().await?;

        Ok(Response::new(proto::connectors::v1::ListConnectorsResponse {
            connectors: connectors.into_iter().map(Into::into).collect(),
        }))
    }

    #[instrument(skip(self, request), name = "grpc_delete_connector")]
    async fn delete_connector(
        &self,
        request: Request<proto::connectors::v1::DeleteConnectorRequest>,
    ) -> Result<Response<proto::connectors::v1::DeleteConnectorResponse>, Status> {
        let message = request.into_inner();

        self.service.delete_connector(&message.connector_id).await?;

        Ok(Response::new(proto::connectors::v1::DeleteConnectorResponse {}))
    }
}
