//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup
//!     → tls.rs (cert/cert.pem + cert/cert.key present?)
//!     → Transport::Tls(RustlsConfig) | Transport::Plaintext
//!     → http::server picks axum-server (TLS) or axum::serve (plaintext)
//! ```
//!
//! # Design Decisions
//! - Transport is chosen once at startup and never changes
//! - Half-present material fails startup instead of downgrading to plaintext

pub mod tls;

pub use tls::{load_transport, Transport, TransportError, TransportMaterial};
