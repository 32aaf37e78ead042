//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::routing::RoutingMode;
use crate::scan::filter::DEFAULT_IGNORED_DIRS;
use crate::scan::{PathFilter, ScanConfig, ScanError};

/// Root configuration for the directory server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, TLS material).
    pub listener: ListenerConfig,

    /// What gets enumerated and served.
    pub scan: ScanSettings,

    /// Index vs file routing.
    pub routing: RoutingConfig,

    /// Basic authentication.
    pub auth: AuthConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ServerConfig {
    /// `host:port` string handed to the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listener.bind_host, self.listener.port)
    }

    /// Build the immutable scan configuration (canonicalizes the root).
    pub fn scan_config(&self) -> Result<ScanConfig, ScanError> {
        let filter = PathFilter::new(
            self.scan.ignored_dirs.iter().cloned(),
            self.scan.only_ext.clone(),
        );
        Ok(ScanConfig::new(&self.scan.root, filter)?
            .with_follow_symlinks(self.scan.follow_symlinks)
            .with_sizes(self.scan.show_sizes))
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub bind_host: String,

    /// TCP port.
    pub port: u16,

    /// Certificate locations; TLS is used only when both files exist.
    pub tls: TlsConfig,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 8080,
            tls: TlsConfig::default(),
        }
    }
}

/// TLS material locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from("cert/cert.pem"),
            key_path: PathBuf::from("cert/cert.key"),
        }
    }
}

/// Directory scan settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Directory to enumerate and serve from.
    pub root: PathBuf,

    /// Directory base names never descended into.
    pub ignored_dirs: Vec<String>,

    /// Optional extension allow-list (without dots, case-sensitive).
    pub only_ext: Option<Vec<String>>,

    /// Descend into symlinked directories and list symlinked files.
    pub follow_symlinks: bool,

    /// Show formatted file sizes on the index page.
    pub show_sizes: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
            only_ext: None,
            follow_symlinks: false,
            show_sizes: true,
        }
    }
}

/// Routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RoutingConfig {
    pub mode: RoutingMode,
}

/// Basic authentication configuration.
///
/// Leaving `basic_auth` unset disables authentication entirely.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Expected `Authorization: Basic <payload>` payload, compared verbatim.
    pub basic_auth: Option<String>,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Time allowed until response headers are produced, in seconds.
    pub request_secs: u64,

    /// Directory scan limit in seconds.
    pub scan_secs: u64,

    /// Longest wait for a single file read while streaming, in seconds.
    pub stream_idle_secs: u64,

    /// Grace period for in-flight requests on TLS shutdown, in seconds.
    /// The plaintext listener drains without a deadline.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            scan_secs: 20,
            stream_idle_secs: 60,
            shutdown_grace_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
