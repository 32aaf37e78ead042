//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ServerConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { name: String, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { name, message } => write!(f, "Invalid {}: {}", name, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read a TOML file without validating it.
pub fn read_config_file(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Overlay recognised environment variables onto `config`.
///
/// Takes the variables as an iterator so callers (and tests) control the
/// source; `main` passes `std::env::vars()`. Unknown names are ignored.
pub fn apply_env<I, K, V>(config: &mut ServerConfig, vars: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    for (name, value) in vars {
        let name = name.as_ref();
        let value: String = value.into();
        match name {
            "PORT" => {
                config.listener.port = value
                    .trim()
                    .parse()
                    .map_err(|e| env_error(name, format!("{}", e)))?;
            }
            "SCAN_PATH" => config.scan.root = value.into(),
            "BASIC_AUTH" => {
                config.auth.basic_auth = if value.is_empty() { None } else { Some(value) };
            }
            "ONLY_EXT" => {
                let exts = split_list(&value);
                config.scan.only_ext = if exts.is_empty() { None } else { Some(exts) };
            }
            "IGNORE_DIRS" => config.scan.ignored_dirs = split_list(&value),
            "ROUTING_MODE" => {
                config.routing.mode = value.parse().map_err(|e| env_error(name, e))?;
            }
            "SHOW_SIZES" => config.scan.show_sizes = parse_bool(name, &value)?,
            "FOLLOW_SYMLINKS" => config.scan.follow_symlinks = parse_bool(name, &value)?,
            "LOG_LEVEL" => config.observability.log_level = value,
            _ => {}
        }
    }
    Ok(())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(env_error(name, format!("expected a boolean, got '{}'", other))),
    }
}

fn env_error(name: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Env {
        name: name.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RoutingMode;
    use std::path::PathBuf;

    #[test]
    fn test_apply_env() {
        let mut config = ServerConfig::default();
        apply_env(
            &mut config,
            [
                ("PORT", "9000"),
                ("SCAN_PATH", "/tmp/fixture"),
                ("BASIC_AUTH", "c2VjcmV0"),
                ("ONLY_EXT", "txt, json,,"),
                ("ROUTING_MODE", "extension"),
                ("SHOW_SIZES", "false"),
                ("HOME", "/root"),
            ],
        )
        .unwrap();

        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.scan.root, PathBuf::from("/tmp/fixture"));
        assert_eq!(config.auth.basic_auth.as_deref(), Some("c2VjcmV0"));
        assert_eq!(config.scan.only_ext, Some(vec!["txt".to_string(), "json".to_string()]));
        assert_eq!(config.routing.mode, RoutingMode::Extension);
        assert!(!config.scan.show_sizes);
    }

    #[test]
    fn test_empty_values_unset() {
        let mut config = ServerConfig::default();
        apply_env(&mut config, [("BASIC_AUTH", ""), ("ONLY_EXT", " , ")]).unwrap();
        assert!(config.auth.basic_auth.is_none());
        assert!(config.scan.only_ext.is_none());
    }

    #[test]
    fn test_bad_values_rejected() {
        let mut config = ServerConfig::default();
        assert!(matches!(
            apply_env(&mut config, [("PORT", "eighty")]),
            Err(ConfigError::Env { .. })
        ));
        assert!(apply_env(&mut config, [("ROUTING_MODE", "sideways")]).is_err());
        assert!(apply_env(&mut config, [("SHOW_SIZES", "maybe")]).is_err());
    }

    #[test]
    fn test_read_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dirll.toml");
        fs::write(
            &path,
            format!(
                "[scan]\nroot = {:?}\n\n[listener]\nport = 8443\n",
                dir.path().to_string_lossy()
            ),
        )
        .unwrap();

        let config = read_config_file(&path).unwrap();
        assert_eq!(config.listener.port, 8443);
    }

    #[test]
    fn test_read_config_file_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[listener\nport = ").unwrap();
        assert!(matches!(read_config_file(&path), Err(ConfigError::Parse(_))));
    }
}
