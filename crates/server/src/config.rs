//! Gateway configuration.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. `./rdpgate.toml`, or the file named by `RDPGATE_CONFIG`
//! 3. Environment variables, e.g. `RDPGATE_PLATFORM__MAX_REDIRECTS=3`

use std::net::SocketAddr;
use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, Source};
use rdpgate_infrastructure::{CacheBackend, CacheConfig, PlatformConfig};
use serde::Deserialize;

use crate::error::ServerError;

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8888,
        }
    }
}

/// Root configuration of the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Data platform endpoints and request limits.
    pub platform: PlatformConfig,
    /// Snapshot cache store.
    pub cache: CacheConfig,
}

impl GatewayConfig {
    /// Loads configuration from the default file locations and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or the result is invalid.
    pub fn load() -> Result<Self, ServerError> {
        let file = std::env::var("RDPGATE_CONFIG").unwrap_or_else(|_| "rdpgate".to_string());
        let config: Self = Self::builder(File::with_name(&file).required(false))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`, still honouring environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unparseable, or the result is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let config: Self = Self::builder(File::from(path.as_ref()))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn builder<S>(file: S) -> ConfigBuilder<DefaultState>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder().add_source(file).add_source(
            Environment::with_prefix("RDPGATE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] naming the first violated constraint.
    pub fn validate(&self) -> Result<(), ServerError> {
        let invalid = |message: &str| Err(ServerError::Config(ConfigError::Message(message.to_string())));

        if self.platform.request_timeout_secs == 0 {
            return invalid("platform.request_timeout_secs must be greater than 0");
        }
        if self.cache.backend == CacheBackend::File && self.cache.directory.is_none() {
            return invalid("cache.directory is required when cache.backend = \"file\"");
        }
        self.platform.auth_endpoint()?;
        self.platform.universe_endpoint()?;
        Ok(())
    }

    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidAddress`] if host and port do not form an address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let raw = format!("{}:{}", self.server.host, self.server.port);
        raw.parse().map_err(|_| ServerError::InvalidAddress(raw))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.server.port, 8888);
        assert_eq!(config.platform.max_redirects, 5);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.socket_addr().unwrap().port(), 8888);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9100

[platform]
max_redirects = 2
auth_url = "http://127.0.0.1:7000/token"

[cache]
backend = "file"
directory = "/var/cache/rdpgate"
"#
        )
        .unwrap();

        let config = GatewayConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.platform.max_redirects, 2);
        assert_eq!(config.platform.default_scope, "trapi");
        assert_eq!(config.cache.backend, CacheBackend::File);
    }

    #[test]
    fn test_file_backend_without_directory_is_rejected() {
        let config = GatewayConfig {
            cache: CacheConfig {
                backend: CacheBackend::File,
                directory: None,
            },
            ..GatewayConfig::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_bad_endpoint_is_rejected() {
        let mut config = GatewayConfig::default();
        config.platform.universe_url = "nowhere".to_string();
        assert!(matches!(config.validate(), Err(ServerError::Application(_))));
    }

    #[test]
    fn test_invalid_address() {
        let mut config = GatewayConfig::default();
        config.server.host = "not an ip".to_string();
        assert!(matches!(config.socket_addr(), Err(ServerError::InvalidAddress(_))));
    }
}
