//! rdpgate Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer:
//! - [`TokenClient`] and [`UniverseClient`] talk to the data platform
//!   through [`RedirectingHttpClient`]
//! - [`InMemoryStore`] and [`FileStore`] back the snapshot cache

pub mod adapters;
pub mod auth;
pub mod config;
pub mod persistence;
pub mod universe;

pub use adapters::{PlatformResponse, RedirectingHttpClient};
pub use auth::TokenClient;
pub use config::{
    CacheBackend, CacheConfig, DEFAULT_AUTH_URL, DEFAULT_UNIVERSE_URL, PlatformConfig,
};
pub use persistence::{FileStore, InMemoryStore};
pub use universe::UniverseClient;
