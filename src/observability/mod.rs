//! # Observability
//!
//! Tracing subscriber setup. `RUST_LOG` takes precedence over the configured
//! log level so operators can adjust filtering without touching config.

use crate::config::ObservabilityConfig;
use crate::errors::{RegistryError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Fails if a subscriber was already installed, which in practice means
/// `init_tracing` was called twice.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let result = if config.json_logs {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| {
        RegistryError::config(format!("Failed to initialize tracing subscriber: {}", e))
    })?;

    tracing::info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json = config.json_logs,
        "Tracing initialized"
    );

    Ok(())
}
