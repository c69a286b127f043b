//! Server configuration.
//!
//! Settings for the HTTP generation endpoint. Values come from defaults,
//! then environment variables, then command-line flags.

use std::net::SocketAddr;
use thiserror::Error;

/// Default listen address for `serve`.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default request body cap (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration for the generation server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `FORGE_BIND_ADDR`: Listen address (default: 127.0.0.1:3000)
    /// - `FORGE_MAX_BODY_BYTES`: Request body cap in bytes (default: 1048576)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("FORGE_BIND_ADDR") {
            config.bind_addr = parse_env_value(&val, "FORGE_BIND_ADDR")?;
        }

        if let Some(val) = lookup("FORGE_MAX_BODY_BYTES") {
            config.max_body_bytes = parse_env_value(&val, "FORGE_MAX_BODY_BYTES")?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_body_bytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder method to set the listen address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Builder method to set the request body cap.
    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }
}

/// Parse an environment variable value into a type.
fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("could not parse '{}'", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.max_body_bytes, 1_048_576);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        let config = ServerConfig::new()
            .with_bind_addr(addr)
            .with_max_body_bytes(4096);
        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.max_body_bytes, 4096);
    }

    #[test]
    fn test_from_lookup_overrides_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("FORGE_BIND_ADDR", "0.0.0.0:9000"),
            ("FORGE_MAX_BODY_BYTES", "2048"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.max_body_bytes, 2048);
    }

    #[test]
    fn test_from_lookup_empty_is_default() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_invalid_bind_addr() {
        let err = ServerConfig::from_lookup(lookup_from(&[("FORGE_BIND_ADDR", "localhost")]))
            .unwrap_err();
        assert!(err.to_string().contains("FORGE_BIND_ADDR"));
    }

    #[test]
    fn test_validation_zero_body_cap() {
        let result = ServerConfig::default().with_max_body_bytes(0).validate();
        assert!(result.unwrap_err().to_string().contains("max_body_bytes"));
    }
}
