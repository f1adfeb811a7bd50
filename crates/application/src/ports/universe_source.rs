//! Universe source port

use async_trait::async_trait;
use rdpgate_domain::{AccessGrant, UniverseSnapshot};

use crate::ApplicationResult;

/// Port for retrieving the universe dataset from the data platform.
#[async_trait]
pub trait UniverseSource: Send + Sync {
    /// Fetches and normalizes the universe.
    ///
    /// # Arguments
    /// * `grant` - Access token used for the `Authorization` header
    /// * `override_url` - Endpoint to use instead of the configured one
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Data`](crate::ApplicationError::Data) when
    /// the platform rejects the request.
    async fn fetch_universe(
        &self,
        grant: &AccessGrant,
        override_url: Option<&str>,
    ) -> ApplicationResult<UniverseSnapshot>;
}
