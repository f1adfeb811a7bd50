//! Platform and cache settings consumed by the adapters.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rdpgate_application::{ApplicationError, ApplicationResult, KeyValueStore};
use rdpgate_domain::DEFAULT_SCOPE;
use serde::Deserialize;
use url::Url;

use crate::persistence::{FileStore, InMemoryStore};

/// Default auth endpoint of the data platform.
pub const DEFAULT_AUTH_URL: &str = "https://api.refinitiv.com/auth/oauth2/v1/token";

/// Default universe endpoint of the data platform.
pub const DEFAULT_UNIVERSE_URL: &str =
    "https://api.refinitiv.com/data/environmental-social-governance/v1/universe";

/// Data platform connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Token endpoint.
    pub auth_url: String,
    /// Universe endpoint.
    pub universe_url: String,
    /// Scope sent with password grants.
    pub default_scope: String,
    /// Maximum redirects followed per request.
    pub max_redirects: usize,
    /// Deadline for a whole request chain, redirects included.
    pub request_timeout_secs: u64,
    /// User-Agent sent to the platform.
    pub user_agent: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            universe_url: DEFAULT_UNIVERSE_URL.to_string(),
            default_scope: DEFAULT_SCOPE.to_string(),
            max_redirects: 5,
            request_timeout_secs: 30,
            user_agent: format!("rdpgate/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl PlatformConfig {
    /// Parsed token endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::InvalidUrl`] if `auth_url` does not parse.
    pub fn auth_endpoint(&self) -> ApplicationResult<Url> {
        parse_endpoint(&self.auth_url)
    }

    /// Parsed universe endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::InvalidUrl`] if `universe_url` does not parse.
    pub fn universe_endpoint(&self) -> ApplicationResult<Url> {
        parse_endpoint(&self.universe_url)
    }

    /// Whole-chain request deadline.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub(crate) fn parse_endpoint(raw: &str) -> ApplicationResult<Url> {
    Url::parse(raw.trim()).map_err(|e| ApplicationError::InvalidUrl(format!("{e}: {raw}")))
}

/// Which key-value store backs the snapshot cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local map; contents are lost on restart.
    #[default]
    Memory,
    /// One JSON file per identity under `directory`.
    File,
}

/// Snapshot cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Store implementation.
    pub backend: CacheBackend,
    /// Root directory for the file backend.
    pub directory: Option<PathBuf>,
}

impl CacheConfig {
    /// Builds the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Storage`] if the file backend has no directory.
    pub fn build_store(&self) -> ApplicationResult<Arc<dyn KeyValueStore>> {
        match self.backend {
            CacheBackend::Memory => Ok(Arc::new(InMemoryStore::new())),
            CacheBackend::File => {
                let directory = self.directory.clone().ok_or_else(|| {
                    ApplicationError::Storage(
                        "cache.directory is required for the file backend".to_string(),
                    )
                })?;
                Ok(Arc::new(FileStore::new(directory)))
            }
        }
    }
}
