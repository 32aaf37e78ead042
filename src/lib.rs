//! dirll: browse and download a directory tree over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ net (TLS?) ──▶ http::server ──▶ security::auth ──▶ routing::mode
//!                                                                   │
//!                                  ┌────────────────────────────────┴──────────┐
//!                                  ▼                                           ▼
//!                        scan (walk + filter)                     routing::resolve
//!                                  │                                           │
//!                                  ▼                                           ▼
//!                     http::index_page + format                    http::response (stream)
//! ```
//!
//! Cross-cutting: `config` (TOML + env), `observability` (tracing, metrics),
//! `lifecycle` (startup, signals, graceful shutdown), `error` (status mapping).

pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod scan;
pub mod security;

pub use config::ServerConfig;
pub use error::ServeError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
