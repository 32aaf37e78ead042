//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, tracing span)
//!     → security::auth (Basic credential check)
//!     → routing (index or file)
//!     → response.rs (render index / stream file, content_type.rs)
//!     → Send to client
//! ```

pub mod content_type;
pub mod index_page;
pub mod request;
pub mod response;
pub mod server;

pub use content_type::ContentTypeRule;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
