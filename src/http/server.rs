//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the single request handler
//! - Wire up middleware (request ID, tracing, timeout, auth)
//! - Serve over plaintext or TLS depending on the loaded transport
//! - Dispatch each request to index or file mode
//! - Drain in-flight requests on shutdown

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::Uri,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ServerConfig, TimeoutConfig};
use crate::error::ServeError;
use crate::http::request::{make_request_span, request_id_header};
use crate::http::response::{file_response, index_response};
use crate::net::Transport;
use crate::observability::metrics;
use crate::routing::{normalize, Mode, RoutingMode};
use crate::scan::{DirectoryScanner, ScanError};
use crate::security::{basic_auth_middleware, AccessGate};

/// Application state injected into handlers. Immutable and cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub scanner: DirectoryScanner,
    pub root: Arc<PathBuf>,
    pub routing: RoutingMode,
    pub scan_timeout: Duration,
    pub stream_idle_timeout: Duration,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Result<Self, ScanError> {
        let scan_config = Arc::new(config.scan_config()?);
        let root = Arc::new(scan_config.root().to_path_buf());
        Ok(Self {
            scanner: DirectoryScanner::new(scan_config),
            root,
            routing: config.routing.mode,
            scan_timeout: Duration::from_secs(config.timeouts.scan_secs),
            stream_idle_timeout: Duration::from_secs(config.timeouts.stream_idle_secs),
        })
    }
}

/// HTTP server for the directory listing.
pub struct HttpServer {
    router: Router,
    transport: Transport,
    timeouts: TimeoutConfig,
}

impl HttpServer {
    /// Create a new plaintext HTTP server with the given configuration.
    ///
    /// Fails if the scan root cannot be canonicalized.
    pub fn new(config: ServerConfig) -> Result<Self, ScanError> {
        let state = AppState::from_config(&config)?;
        let gate = AccessGate::new(config.auth.basic_auth.clone());

        tracing::info!(
            root = ?state.root,
            routing = %state.routing,
            auth = gate.is_enabled(),
            "Serving directory"
        );

        let router = build_router(&config, state, gate);
        Ok(Self {
            router,
            transport: Transport::Plaintext,
            timeouts: config.timeouts,
        })
    }

    /// Serve over the given transport instead of plaintext.
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            scheme = self.transport.scheme(),
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        match self.transport {
            Transport::Plaintext => {
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown.recv().await;
                        tracing::info!("Shutdown signal received");
                    })
                    .await?;
            }
            Transport::Tls(tls) => {
                let handle = axum_server::Handle::new();
                let drain = handle.clone();
                let grace = Duration::from_secs(self.timeouts.shutdown_grace_secs);
                tokio::spawn(async move {
                    let _ = shutdown.recv().await;
                    tracing::info!("Shutdown signal received");
                    drain.graceful_shutdown(Some(grace));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, tls)
                    .handle(handle)
                    .serve(app)
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ServerConfig, state: AppState, gate: AccessGate) -> Router {
    Router::new()
        .route("/", get(serve_request))
        .route("/{*path}", get(serve_request))
        .layer(middleware::from_fn_with_state(gate, basic_auth_middleware))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                .layer(PropagateRequestIdLayer::new(request_id_header())),
        )
}

/// Single entry point: pick a mode, then render or stream.
async fn serve_request(State(state): State<AppState>, uri: Uri) -> Response {
    let start_time = Instant::now();
    let path = uri.path();
    let mode = state.routing.select(path);

    tracing::debug!(mode = mode.as_str(), "Routing request");

    // Paths that climb out of the root never reach a listing, in either mode.
    let result = if normalize(path).is_none() {
        tracing::warn!(path = %path, "Rejected path outside scan root");
        Err(ServeError::NotFound)
    } else {
        match mode {
            Mode::Index => index_response(&state.scanner, state.routing, state.scan_timeout).await,
            Mode::File => file_response(&state.root, path, state.stream_idle_timeout).await,
        }
    };
    let response = result.unwrap_or_else(IntoResponse::into_response);

    metrics::record_request(mode.as_str(), response.status().as_u16(), start_time);
    response
}
