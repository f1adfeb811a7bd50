//! rdpgate Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for the data platform and the cache store)
//! - The identity-keyed snapshot cache
//! - Use case orchestration
//! - Application-level error handling

pub mod cache;
pub mod error;
pub mod ports;
#[cfg(test)]
mod testing;
pub mod use_cases;

pub use cache::{CacheMode, UniverseCache};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    CancellationReceiver, CancellationToken, KeyValueStore, StoreError, TokenService,
    UniverseSource,
};
pub use use_cases::{
    FetchUniverse, FetchUniverseInput, FetchUniverseOutput, RequestToken, SearchUniverse,
    SearchUniverseInput,
};
