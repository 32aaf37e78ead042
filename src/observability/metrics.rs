//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dirll_requests_total` (counter): requests by mode, status
//! - `dirll_request_duration_seconds` (histogram): time to response headers
//! - `dirll_scan_entries` (histogram): entries listed per index scan
//! - `dirll_scan_duration_seconds` (histogram): directory walk time
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(mode: &'static str, status: u16, start: Instant) {
    metrics::counter!("dirll_requests_total", "mode" => mode, "status" => status.to_string())
        .increment(1);
    metrics::histogram!("dirll_request_duration_seconds", "mode" => mode)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_scan(entries: usize, elapsed: Duration) {
    metrics::histogram!("dirll_scan_entries").record(entries as f64);
    metrics::histogram!("dirll_scan_duration_seconds").record(elapsed.as_secs_f64());
}
