//! Directory scanning subsystem.
//!
//! # Data Flow
//! ```text
//! ScanSettings (config)
//!     → ScanConfig (canonical root, PathFilter; immutable)
//!     → scanner.rs (depth-first walk, pruning ignored dirs)
//!     → filter.rs (extension allow-list on candidate files)
//!     → Vec<Entry> (per request, never cached)
//! ```
//!
//! # Design Decisions
//! - The whole tree is walked before the index is rendered
//! - Walks run on the blocking pool, never on the reactor
//! - Any unreadable directory fails the scan; no partial listings

pub mod filter;
pub mod scanner;

pub use filter::PathFilter;
pub use scanner::{DirectoryScanner, Entry, ScanConfig, ScanError};
