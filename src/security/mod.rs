//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → auth.rs (Basic credential vs configured secret)
//!     → 401 + WWW-Authenticate on mismatch
//!     → Pass to routing
//! ```
//!
//! # Design Decisions
//! - Fail closed once a secret is configured
//! - No secret configured means the gate is open
//! - Path containment lives in routing::resolve, before any filesystem access

pub mod auth;

pub use auth::{authorize, basic_auth_middleware, AccessGate};
