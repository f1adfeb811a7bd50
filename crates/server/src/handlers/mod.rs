//! HTTP handlers.

mod health;
mod search;
mod token;
mod universe;

pub use health::health_check;
pub use search::search_universe;
pub use token::{TokenResponse, get_new_token, post_new_token};
pub use universe::{UniverseResponse, get_universe, post_universe};
