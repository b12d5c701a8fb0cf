//! gRPC server bootstrap and graceful shutdown.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tonic::transport::Server;

use crate::config::ServerConfig;
use crate::errors::{RegistryError, Result};
use crate::service::ConnectorService;

use super::{ConnectorServiceServer, ConnectorsGrpcHandler};

/// Start the gRPC server and block until shutdown.
///
/// On SIGINT/SIGTERM the server stops accepting connections and drains
/// in-flight requests; the configured graceful shutdown timeout bounds the
/// drain, after which remaining requests are dropped.
pub async fn start_grpc_server(
    config: &ServerConfig,
    service: Arc<ConnectorService>,
) -> Result<()> {
    let addr: SocketAddr = config.socket_address().parse().map_err(|e| {
        RegistryError::transport(format!(
            "Invalid gRPC listen address '{}': {}",
            config.socket_address(),
            e
        ))
    })?;

    let handler = ConnectorsGrpcHandler::new(service);

    tracing::info!(address = %addr, "Starting gRPC server");

    let stop = Arc::new(Notify::new());
    let drain = Arc::clone(&stop);
    let server = Server::builder()
        .add_service(ConnectorServiceServer::new(handler))
        .serve_with_shutdown(addr, async move { drain.notified().await });

    run_until_drained(server, shutdown_signal(), stop, config.graceful_shutdown_timeout())
        .await?;

    tracing::info!("gRPC server stopped");
    Ok(())
}

/// Drive the server future, switching to a bounded drain once the shutdown
/// signal fires. `stop` is the notify handle the server's shutdown future
/// waits on.
async fn run_until_drained<S, G, E>(
    server: S,
    signal: G,
    stop: Arc<Notify>,
    drain_timeout: Duration,
) -> Result<()>
where
    S: Future<Output = std::result::Result<(), E>>,
    G: Future<Output = ()>,
    E: std::fmt::Display,
{
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            return result
                .map_err(|e| RegistryError::transport(format!("gRPC server error: {}", e)));
        }
        _ = signal => {
            stop.notify_one();
        }
    }

    tracing::info!(
        drain_timeout_seconds = drain_timeout.as_secs(),
        "Shutdown signal received, draining in-flight requests"
    );

    match tokio::time::timeout(drain_timeout, &mut server).await {
        Ok(result) => {
            result.map_err(|e| RegistryError::transport(format!("gRPC server error: {}", e)))
        }
        Err(_) => {
            tracing::warn!("Drain timeout elapsed, dropping remaining in-flight requests");
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
