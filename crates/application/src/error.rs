//! Application error types

use rdpgate_domain::{AuthError, DataError, DomainError};
use thiserror::Error;

/// Application-level errors.
///
/// Platform rejections (`Auth`, `Data`) carry the platform's payload verbatim;
/// the remaining variants describe why no platform answer was obtained.
#[derive(Debug, Clone, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The auth endpoint rejected the credentials.
    #[error("{0}")]
    Auth(AuthError),

    /// The universe endpoint rejected the request.
    #[error("{0}")]
    Data(DataError),

    /// The connection could not be established or was interrupted.
    #[error("transport error: {message}")]
    Transport {
        /// Underlying cause.
        message: String,
    },

    /// The whole request chain exceeded its deadline.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The deadline that was exceeded.
        timeout_ms: u64,
    },

    /// The operation was cancelled by the caller.
    #[error("operation cancelled")]
    Cancelled,

    /// More redirects than allowed were encountered.
    #[error("redirect limit of {max_hops} exceeded (last location: {last_location})")]
    RedirectExhausted {
        /// The configured hop bound.
        max_hops: usize,
        /// The location that would have been followed next.
        last_location: String,
    },

    /// A response body was present but did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// An endpoint or redirect URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The key-value store failed or held an undecodable value.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<AuthError> for ApplicationError {
    fn from(error: AuthError) -> Self {
        Self::Auth(error)
    }
}

impl From<DataError> for ApplicationError {
    fn from(error: DataError) -> Self {
        Self::Data(error)
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
