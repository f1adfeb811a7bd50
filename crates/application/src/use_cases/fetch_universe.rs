//! Fetch universe use case.

use std::sync::Arc;

use rdpgate_domain::{AccessGrant, UniverseSnapshot};

use crate::cache::{CacheMode, UniverseCache};
use crate::ports::{CancellationReceiver, KeyValueStore, UniverseSource};
use crate::{ApplicationError, ApplicationResult};

/// Input for fetching the universe.
#[derive(Debug, Clone)]
pub struct FetchUniverseInput {
    /// Token presented to the universe endpoint.
    pub grant: AccessGrant,
    /// Endpoint to use instead of the configured one.
    pub override_url: Option<String>,
    /// Identity to cache the snapshot under.
    pub identity: Option<String>,
    /// Whether to write the snapshot into the cache.
    pub update_cache: bool,
    /// How much of the snapshot the cache write keeps.
    pub cache_mode: CacheMode,
    /// Whether the output carries headers and records, or only the count.
    pub include_records: bool,
}

impl FetchUniverseInput {
    /// Creates an input that fetches without caching and returns everything.
    #[must_use]
    pub const fn new(grant: AccessGrant) -> Self {
        Self {
            grant,
            override_url: None,
            identity: None,
            update_cache: false,
            cache_mode: CacheMode::Full,
            include_records: true,
        }
    }

    /// Enables a cache write under `identity`.
    #[must_use]
    pub fn cache_as(mut self, identity: impl Into<String>, mode: CacheMode) -> Self {
        self.identity = Some(identity.into());
        self.update_cache = true;
        self.cache_mode = mode;
        self
    }

    fn cache_identity(&self) -> Option<&str> {
        if !self.update_cache {
            return None;
        }
        self.identity.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// Output from fetching the universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchUniverseOutput {
    /// The snapshot, trimmed to its count when records were not requested.
    pub snapshot: UniverseSnapshot,
    /// True if the cache write completed.
    pub cache_updated: bool,
}

/// Use case for fetching the universe and optionally caching it.
///
/// The cache write, when requested, completes before `execute` returns.
pub struct FetchUniverse<U: UniverseSource + ?Sized, S: KeyValueStore + ?Sized> {
    source: Arc<U>,
    cache: UniverseCache<S>,
}

impl<U: UniverseSource + ?Sized, S: KeyValueStore + ?Sized> FetchUniverse<U, S> {
    /// Creates a new `FetchUniverse` use case.
    pub const fn new(source: Arc<U>, cache: UniverseCache<S>) -> Self {
        Self { source, cache }
    }

    /// Fetches the universe, then writes the cache if requested.
    ///
    /// # Errors
    ///
    /// Returns the source's error, or [`ApplicationError::Storage`] if the
    /// requested cache write fails.
    pub async fn execute(&self, input: &FetchUniverseInput) -> ApplicationResult<FetchUniverseOutput> {
        let snapshot = self
            .source
            .fetch_universe(&input.grant, input.override_url.as_deref())
            .await
            .inspect_err(|error| tracing::warn!(%error, "universe fetch failed"))?;

        tracing::debug!(
            reported = ?snapshot.count,
            records = snapshot.records.len(),
            headers = snapshot.headers.len(),
            "universe fetched"
        );

        let cache_updated = match input.cache_identity() {
            Some(identity) => {
                self.cache.put(identity, &snapshot, input.cache_mode).await?;
                true
            }
            None => {
                if input.update_cache {
                    tracing::warn!("cache update requested without an identity; skipping");
                }
                false
            }
        };

        let snapshot = if input.include_records {
            snapshot
        } else {
            snapshot.count_only()
        };

        Ok(FetchUniverseOutput {
            snapshot,
            cache_updated,
        })
    }

    /// Same as [`execute`](Self::execute), aborting on cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Cancelled`] if cancelled first.
    pub async fn execute_with_cancellation(
        &self,
        input: &FetchUniverseInput,
        mut cancel: CancellationReceiver,
    ) -> ApplicationResult<FetchUniverseOutput> {
        tokio::select! {
            result = self.execute(input) => result,
            () = cancel.cancelled() => Err(ApplicationError::Cancelled),
        }
    }
}
