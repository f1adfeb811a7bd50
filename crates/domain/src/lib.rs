//! rdpgate Domain - Core gateway types
//!
//! This crate defines the domain model for the universe gateway: credential
//! exchange types, universe snapshots and the record search engine.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod lenient;
pub mod universe;

pub use auth::{
    AccessGrant, AuthError, Credential, DEFAULT_SCOPE, DEFAULT_TOKEN_TYPE, GrantKind, Token, TokenRequest,
};
pub use error::{DomainError, DomainResult};
pub use universe::{
    ColumnMapping, DataError, HeaderMeta, InvalidField, SearchField, SearchKind, UniverseRecord,
    UniverseSnapshot, normalize_rows, search,
};
