//! Application Configuration
//!
//! Everything the process needs is read once, from the environment
//! (optionally seeded from a `.env` file), into an [`AppConfig`] that is
//! then passed by reference to whatever needs it.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::connection::ConnectionConfig;
use crate::http_server::HttpServerConfig;
use crate::records::statements::DEFAULT_PART_TABLE;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("failed to load env file {path}: {reason}")]
    EnvFile { path: String, reason: String },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, value: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Parse a boolean flag value
pub fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, raw)),
    }
}

/// Process-wide configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http: HttpServerConfig,
    pub connection: ConnectionConfig,
    /// Part master table, `TABLE` or `LIBRARY.TABLE` (`AS400_PART_TABLE`)
    pub part_table: String,
}

impl AppConfig {
    /// Read configuration through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            http: HttpServerConfig::from_lookup(&lookup)?,
            connection: ConnectionConfig::from_lookup(&lookup)?,
            part_table: lookup("AS400_PART_TABLE")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_PART_TABLE.to_string()),
        })
    }

    /// Load `env_file` (or `.env` when present) into the process environment, then read it
    ///
    /// Variables already set in the environment take precedence over the file.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::load_env_file(env_file)? {
            Some(path) => info!(path = %path.display(), "loaded env file"),
            None => warn!("no .env file found, using process environment"),
        }
        Self::from_env()
    }

    /// Merge `env_file` (or `.env` when present) into the process environment
    ///
    /// Returns the file that was read, or `None` when no `.env` exists. Runs
    /// before logging is set up so `RUST_LOG` from the file is honoured.
    pub fn load_env_file(env_file: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
        match env_file {
            Some(path) => {
                dotenv::from_path(path).map_err(|e| ConfigError::EnvFile {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                Ok(Some(path.to_path_buf()))
            }
            None => Ok(dotenv::dotenv().ok()),
        }
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("K", "TRUE"), Ok(true));
        assert_eq!(parse_bool("K", " off "), Ok(false));
        assert!(parse_bool("K", "2").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.part_table, "GOM.BUHIN");
        assert_eq!(config.http.port, 8000);
        assert!(!config.connection.is_configured());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("AS400_CONNECTION_STRING", "DSN=PROD;PWD=x;"),
            ("AS400_PART_TABLE", "QGPL.PARTS"),
            ("HTTP_PORT", "9000"),
        ]
        .into_iter()
        .collect();
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.part_table, "QGPL.PARTS");
        assert_eq!(config.http.port, 9000);
        assert!(config.connection.is_configured());
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let result = AppConfig::from_lookup(|k| (k == "HTTP_PORT").then(|| "eighty".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
