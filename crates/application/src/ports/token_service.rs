//! Token service port

use async_trait::async_trait;
use rdpgate_domain::{Token, TokenRequest};

use crate::ApplicationResult;

/// Port for exchanging credentials for an access token.
#[async_trait]
pub trait TokenService: Send + Sync {
    /// Executes one logical token request, following redirects as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Auth`](crate::ApplicationError::Auth) when
    /// the platform rejects the credentials, and a transport, timeout,
    /// redirect or malformed-response error when no usable answer arrives.
    async fn request_token(&self, request: &TokenRequest) -> ApplicationResult<Token>;
}
