//! Search universe use case.

use rdpgate_domain::{SearchKind, UniverseRecord, search};

use crate::ApplicationResult;
use crate::cache::UniverseCache;
use crate::ports::KeyValueStore;

/// Input for searching a cached universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchUniverseInput {
    /// Identity whose cached snapshot is searched.
    pub identity: String,
    /// Free-text query.
    pub query: String,
    /// Field(s) to match.
    pub kind: SearchKind,
}

/// Use case for searching the snapshot cached under an identity.
pub struct SearchUniverse<S: KeyValueStore + ?Sized> {
    cache: UniverseCache<S>,
}

impl<S: KeyValueStore + ?Sized> SearchUniverse<S> {
    /// Creates a new `SearchUniverse` use case.
    pub const fn new(cache: UniverseCache<S>) -> Self {
        Self { cache }
    }

    /// Returns the matching records.
    ///
    /// A blank identity, an empty query and a cache miss all yield an
    /// empty result.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Storage`](crate::ApplicationError::Storage)
    /// if the cache cannot be read.
    pub async fn execute(&self, input: &SearchUniverseInput) -> ApplicationResult<Vec<UniverseRecord>> {
        if input.identity.trim().is_empty() || input.query.is_empty() {
            return Ok(Vec::new());
        }

        let Some(snapshot) = self.cache.get(&input.identity).await? else {
            tracing::debug!(identity = %input.identity, "no cached universe");
            return Ok(Vec::new());
        };

        let results = search(&input.query, input.kind, &snapshot.records);
        tracing::debug!(
            identity = %input.identity,
            kind = %input.kind,
            matches = results.len(),
            "universe searched"
        );
        Ok(results)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::cache::CacheMode;
    use crate::testing::{BrokenStore, MemoryStore};
    use crate::ApplicationError;
    use pretty_assertions::assert_eq;
    use rdpgate_domain::UniverseSnapshot;
    use std::sync::Arc;

    fn records() -> Vec<UniverseRecord> {
        vec![
            UniverseRecord::new("4295856598", "MSFT.O", "Microsoft Corp"),
            UniverseRecord::new("5035948617", "AAPL.O", "Apple Inc"),
        ]
    }

    async fn seeded() -> SearchUniverse<MemoryStore> {
        let cache = UniverseCache::new(Arc::new(MemoryStore::default()));
        cache
            .put(
                "alice",
                &UniverseSnapshot::new(Some(2), vec![], records()),
                CacheMode::Full,
            )
            .await
            .unwrap();
        SearchUniverse::new(cache)
    }

    fn input(identity: &str, query: &str, kind: SearchKind) -> SearchUniverseInput {
        SearchUniverseInput {
            identity: identity.to_string(),
            query: query.to_string(),
            kind,
        }
    }

    #[tokio::test]
    async fn test_search_cached_snapshot() {
        let use_case = seeded().await;

        let found = use_case.execute(&input("alice", "O", SearchKind::ExchangeCode)).await.unwrap();
        assert_eq!(found, records());

        let found = use_case.execute(&input("alice", "O", SearchKind::Identifier)).await.unwrap();
        assert!(found.is_empty());

        let found = use_case.execute(&input("alice", "apple", SearchKind::Any)).await.unwrap();
        assert_eq!(found, vec![records()[1].clone()]);
    }

    #[tokio::test]
    async fn test_miss_blank_identity_and_empty_query() {
        let use_case = seeded().await;

        assert!(use_case.execute(&input("bob", "msft", SearchKind::Any)).await.unwrap().is_empty());
        assert!(use_case.execute(&input("", "msft", SearchKind::Any)).await.unwrap().is_empty());
        assert!(use_case.execute(&input("alice", "", SearchKind::Any)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let use_case = SearchUniverse::new(UniverseCache::new(Arc::new(BrokenStore)));
        let err = use_case.execute(&input("alice", "msft", SearchKind::Any)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Storage(_)));
    }
}
