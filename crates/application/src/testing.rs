//! In-process test doubles for the application ports.

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rdpgate_domain::{AccessGrant, Token, TokenRequest, UniverseSnapshot};
use tokio::sync::RwLock;

use crate::ApplicationResult;
use crate::ports::{KeyValueStore, StoreError, TokenService, UniverseSource};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store whose every operation fails.
pub struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }
}

/// Token service returning a canned result after an optional delay.
pub struct StubTokenService {
    pub result: ApplicationResult<Token>,
    pub delay: Duration,
    pub requests: Mutex<Vec<TokenRequest>>,
}

impl StubTokenService {
    pub fn new(result: ApplicationResult<Token>) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TokenService for StubTokenService {
    async fn request_token(&self, request: &TokenRequest) -> ApplicationResult<Token> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        tokio::time::sleep(self.delay).await;
        self.result.clone()
    }
}

/// Universe source returning a canned result after an optional delay.
pub struct StubUniverseSource {
    pub result: ApplicationResult<UniverseSnapshot>,
    pub delay: Duration,
}

impl StubUniverseSource {
    pub const fn new(result: ApplicationResult<UniverseSnapshot>) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
        }
    }
}

#[async_trait]
impl UniverseSource for StubUniverseSource {
    async fn fetch_universe(
        &self,
        _grant: &AccessGrant,
        _override_url: Option<&str>,
    ) -> ApplicationResult<UniverseSnapshot> {
        tokio::time::sleep(self.delay).await;
        self.result.clone()
    }
}
