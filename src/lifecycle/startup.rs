//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the optional metrics endpoint
//! - Load transport material (TLS or plaintext)
//! - Build the server (canonicalizes the scan root)
//! - Bind the listener and serve until shutdown

use std::net::SocketAddr;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::net::{load_transport, TransportError};
use crate::observability::metrics;
use crate::scan::ScanError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid scan root: {0}")]
    Scan(#[from] ScanError),
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    #[error("metrics: {0}")]
    Metrics(#[from] BuildError),
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bring the server up and run it until `shutdown` fires.
pub async fn start(config: ServerConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let tls = &config.listener.tls;
    let transport = load_transport(&tls.cert_path, &tls.key_path).await?;

    let address = config.bind_address();
    let server = HttpServer::new(config)?.with_transport(transport);

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
