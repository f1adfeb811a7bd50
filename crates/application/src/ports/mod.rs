//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod cancellation;
mod key_value_store;
mod token_service;
mod universe_source;

pub use cancellation::{CancellationReceiver, CancellationToken};
pub use key_value_store::{KeyValueStore, StoreError};
pub use token_service::TokenService;
pub use universe_source::UniverseSource;
