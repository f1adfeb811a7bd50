//! Shared handler state.

use std::sync::Arc;

use rdpgate_application::{
    CancellationReceiver, FetchUniverse, KeyValueStore, RequestToken, SearchUniverse,
    TokenService, UniverseCache, UniverseSource,
};
use rdpgate_infrastructure::{TokenClient, UniverseClient};

use crate::config::GatewayConfig;
use crate::error::ServerError;

/// Use cases wired to their adapters, shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// Credential exchange.
    pub request_token: Arc<RequestToken<dyn TokenService>>,
    /// Universe retrieval with optional cache write.
    pub fetch_universe: Arc<FetchUniverse<dyn UniverseSource, dyn KeyValueStore>>,
    /// Search over cached snapshots.
    pub search_universe: Arc<SearchUniverse<dyn KeyValueStore>>,
    /// Scope sent with password grants.
    pub default_scope: Arc<str>,
    /// Fires when the server begins shutting down.
    pub shutdown: CancellationReceiver,
}

impl AppState {
    /// Wires the use cases to the given ports.
    #[must_use]
    pub fn new(
        tokens: Arc<dyn TokenService>,
        source: Arc<dyn UniverseSource>,
        store: Arc<dyn KeyValueStore>,
        default_scope: &str,
        shutdown: CancellationReceiver,
    ) -> Self {
        let cache = UniverseCache::new(store);
        Self {
            request_token: Arc::new(RequestToken::new(tokens)),
            fetch_universe: Arc::new(FetchUniverse::new(source, cache.clone())),
            search_universe: Arc::new(SearchUniverse::new(cache)),
            default_scope: Arc::from(default_scope),
            shutdown,
        }
    }

    /// Builds the platform clients and cache store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint is invalid, the HTTP client cannot be
    /// built, or the cache backend is misconfigured.
    pub fn from_config(
        config: &GatewayConfig,
        shutdown: CancellationReceiver,
    ) -> Result<Self, ServerError> {
        let tokens = Arc::new(TokenClient::from_config(&config.platform)?);
        let source = Arc::new(UniverseClient::from_config(&config.platform)?);
        let store = config.cache.build_store()?;

        Ok(Self::new(
            tokens,
            source,
            store,
            &config.platform.default_scope,
            shutdown,
        ))
    }
}
