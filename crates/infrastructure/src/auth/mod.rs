//! Auth endpoint adapter.

mod token_client;

pub use token_client::TokenClient;
