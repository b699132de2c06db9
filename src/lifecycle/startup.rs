//! Startup orchestration.
//!
//! # Responsibilities
//! - Report missing secrets without aborting
//! - Start the metrics exporter when enabled
//! - Build the server, bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast on anything that makes serving impossible (bind, client setup)
//! - Listeners start last (traffic only when ready)

use std::io;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::validation::missing_secrets;
use crate::config::RelayConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Errors that stop the relay from serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to bind {address}: {source}")]
    Bind { address: String, source: io::Error },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

/// Run the relay with `config` until `shutdown` fires.
pub async fn start(config: RelayConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    for variable in missing_secrets(&config) {
        tracing::warn!(
            variable,
            "Configuration value missing; routes that need it will fail until it is set"
        );
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    tracing::info!(address = %address, "Order relay listening");

    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
