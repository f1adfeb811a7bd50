//! Application use cases (business logic orchestration).

mod fetch_universe;
mod request_token;
mod search_universe;

pub use fetch_universe::*;
pub use request_token::*;
pub use search_universe::*;
