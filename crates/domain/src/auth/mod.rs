//! Credential exchange domain types

mod types;

pub use types::{
    AccessGrant, AuthError, Credential, DEFAULT_SCOPE, DEFAULT_TOKEN_TYPE, GrantKind, Token, TokenRequest,
};
