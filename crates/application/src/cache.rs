//! Snapshot cache keyed by requester identity.
//!
//! Snapshots are stored as one JSON document per identity:
//!
//! ```json
//! {
//!   "EsgUniverseCount": 9000,
//!   "EsgUniverseHeader": [{"name": "PermId", "title": null, "type": null, "description": null}],
//!   "EsgUniverse": [{"PermId": "4295856598", "PrimaryRic": "MSFT.O", "CommonName": "Microsoft Corp"}]
//! }
//! ```

use std::str::FromStr;
use std::sync::Arc;

use rdpgate_domain::{DomainError, UniverseSnapshot};
use serde::{Deserialize, Serialize};

use crate::ports::KeyValueStore;
use crate::{ApplicationError, ApplicationResult};

/// How much of a snapshot a cache write keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// Count, headers and records.
    #[default]
    Full,
    /// Count only, with empty headers and records.
    CountOnly,
}

impl FromStr for CacheMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "full" => Ok(Self::Full),
            "count" | "count_only" | "countonly" => Ok(Self::CountOnly),
            _ => Err(DomainError::InvalidCacheMode(s.to_string())),
        }
    }
}

/// Reads and writes universe snapshots through a [`KeyValueStore`].
pub struct UniverseCache<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
}

impl<S: KeyValueStore + ?Sized> Clone for UniverseCache<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore + ?Sized> UniverseCache<S> {
    /// Creates a cache over the given store.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Overwrites the entry for `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Storage`] if serialization or the write fails.
    pub async fn put(
        &self,
        identity: &str,
        snapshot: &UniverseSnapshot,
        mode: CacheMode,
    ) -> ApplicationResult<()> {
        let value = match mode {
            CacheMode::Full => serde_json::to_string(snapshot),
            CacheMode::CountOnly => serde_json::to_string(&snapshot.count_only()),
        }
        .map_err(|e| ApplicationError::Storage(format!("failed to encode snapshot: {e}")))?;

        self.store
            .set(identity, value)
            .await
            .map_err(|e| ApplicationError::Storage(e.to_string()))?;

        tracing::info!(
            identity,
            ?mode,
            records = snapshot.records.len(),
            "universe snapshot cached"
        );
        Ok(())
    }

    /// Reads the entry for `identity`; `None` on a cache miss.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Storage`] if the store fails or the stored
    /// value does not decode as a snapshot.
    pub async fn get(&self, identity: &str) -> ApplicationResult<Option<UniverseSnapshot>> {
        let Some(value) = self
            .store
            .get(identity)
            .await
            .map_err(|e| ApplicationError::Storage(e.to_string()))?
        else {
            return Ok(None);
        };

        if value.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&value).map(Some).map_err(|e| {
            ApplicationError::Storage(format!("cached snapshot for '{identity}' is corrupt: {e}"))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use pretty_assertions::assert_eq;
    use rdpgate_domain::{HeaderMeta, UniverseRecord};

    fn snapshot(name: &str) -> UniverseSnapshot {
        UniverseSnapshot::new(
            Some(1),
            vec![HeaderMeta::named("PermId")],
            vec![UniverseRecord::new("1", "X.N", name)],
        )
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrips() {
        let cache = UniverseCache::new(Arc::new(MemoryStore::default()));
        cache.put("alice", &snapshot("Acme"), CacheMode::Full).await.unwrap();

        assert_eq!(cache.get("alice").await.unwrap(), Some(snapshot("Acme")));
    }

    #[tokio::test]
    async fn test_second_put_replaces_first() {
        let cache = UniverseCache::new(Arc::new(MemoryStore::default()));
        cache.put("alice", &snapshot("Acme"), CacheMode::Full).await.unwrap();

        let replacement = UniverseSnapshot::new(None, vec![], vec![UniverseRecord::default()]);
        cache.put("alice", &replacement, CacheMode::Full).await.unwrap();

        assert_eq!(cache.get("alice").await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn test_count_only_mode() {
        let cache = UniverseCache::new(Arc::new(MemoryStore::default()));
        cache.put("bob", &snapshot("Acme"), CacheMode::CountOnly).await.unwrap();

        assert_eq!(
            cache.get("bob").await.unwrap(),
            Some(UniverseSnapshot::new(Some(1), vec![], vec![]))
        );
    }

    #[tokio::test]
    async fn test_miss_and_corrupt_entries() {
        let store = Arc::new(MemoryStore::default());
        let cache = UniverseCache::new(Arc::clone(&store));
        assert_eq!(cache.get("nobody").await.unwrap(), None);

        store.set("broken", "not json".to_string()).await.unwrap();
        let err = cache.get("broken").await.unwrap_err();
        assert!(matches!(err, ApplicationError::Storage(message) if message.contains("broken")));
    }

    #[test]
    fn test_cache_mode_parsing() {
        assert_eq!("".parse::<CacheMode>().unwrap(), CacheMode::Full);
        assert_eq!("Count".parse::<CacheMode>().unwrap(), CacheMode::CountOnly);
        assert!("partial".parse::<CacheMode>().is_err());
    }
}
