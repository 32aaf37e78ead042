//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure apart from checking that the scan root exists
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ServerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_host.trim().is_empty() {
        errors.push(ValidationError::new("listener.bind_host", "must not be empty"));
    }

    let root = &config.scan.root;
    if !root.is_dir() {
        errors.push(ValidationError::new(
            "scan.root",
            format!("{} is not a readable directory", root.display()),
        ));
    }

    for name in &config.scan.ignored_dirs {
        if name.is_empty() || name.contains('/') {
            errors.push(ValidationError::new(
                "scan.ignored_dirs",
                format!("'{}' is not a directory base name", name),
            ));
        }
    }

    if let Some(exts) = &config.scan.only_ext {
        for ext in exts {
            // Extensions are matched after the final dot, so a dot can never match.
            if ext.is_empty() || ext.contains('.') {
                errors.push(ValidationError::new(
                    "scan.only_ext",
                    format!("'{}' is not a bare extension", ext),
                ));
            }
        }
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.request_secs", timeouts.request_secs),
        ("timeouts.scan_secs", timeouts.scan_secs),
        ("timeouts.stream_idle_secs", timeouts.stream_idle_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }
    if timeouts.scan_secs > 0 && timeouts.scan_secs >= timeouts.request_secs {
        errors.push(ValidationError::new(
            "timeouts.scan_secs",
            format!(
                "must be shorter than timeouts.request_secs ({})",
                timeouts.request_secs
            ),
        ));
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn valid_config(dir: &TempDir) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.scan.root = dir.path().to_path_buf();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        let dir = TempDir::new().unwrap();
        assert!(validate_config(&valid_config(&dir)).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let dir = TempDir::new().unwrap();
        let mut config = valid_config(&dir);
        config.scan.root = dir.path().join("missing");
        config.scan.only_ext = Some(vec![".txt".into()]);
        config.timeouts.scan_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["scan.root", "scan.only_ext", "timeouts.scan_secs"]);
    }

    #[test]
    fn test_scan_must_finish_before_request_timeout() {
        let dir = TempDir::new().unwrap();
        let mut config = valid_config(&dir);
        config.timeouts.scan_secs = 30;
        config.timeouts.request_secs = 30;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "timeouts.scan_secs");

        config.timeouts.request_secs = 31;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let dir = TempDir::new().unwrap();
        let mut config = valid_config(&dir);
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
