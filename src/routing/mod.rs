//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Authenticated request (path)
//!     → mode.rs (Index or File, per deployment mode)
//!     → resolve.rs (File only: decode, normalize, contain under root)
//!     → http::response (render index / stream file)
//! ```
//!
//! # Design Decisions
//! - One routing mode per deployment, fixed at startup
//! - Traversal is rejected lexically before touching the filesystem
//! - Canonical containment check catches symlinks leaving the root

pub mod mode;
pub mod resolve;

pub use mode::{Mode, RoutingMode};
pub use resolve::{normalize, resolve_file, ResolvedFile};
