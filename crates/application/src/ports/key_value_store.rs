//! Key-value store port
//!
//! Defines the interface of the external string-keyed cache service.

use async_trait::async_trait;

/// Errors that can occur during key-value operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Opaque string-keyed get/set service.
///
/// Writes replace the previous value wholesale; there is no merge,
/// versioning or compare-and-swap.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    /// `None` if the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the value could not be written.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}
