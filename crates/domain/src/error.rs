//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while validating gateway inputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The search kind string does not name a known search field.
    #[error("invalid search kind: {0}")]
    InvalidSearchKind(String),

    /// The cache mode string does not name a known mode.
    #[error("invalid cache mode: {0}")]
    InvalidCacheMode(String),

    /// A field required to build an outbound request is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
