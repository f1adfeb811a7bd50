//! Universe endpoint adapter.

mod universe_client;

pub use universe_client::UniverseClient;
