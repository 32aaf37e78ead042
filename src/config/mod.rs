//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → loader.rs (optional TOML file)
//!     → loader.rs (environment overlay: PORT, SCAN_PATH, BASIC_AUTH, ONLY_EXT, ...)
//!     → CLI flags (main.rs)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env, read_config_file, ConfigError};
pub use schema::ServerConfig;
pub use schema::{AuthConfig, ListenerConfig, ObservabilityConfig, ScanSettings, TimeoutConfig, TlsConfig};
pub use validation::validate_config;
