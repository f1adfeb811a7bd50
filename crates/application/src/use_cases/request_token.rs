//! Request Token Use Case
//!
//! Exchanges credentials for an access token through the `TokenService` port.

use std::sync::Arc;

use rdpgate_domain::{Token, TokenRequest};

use crate::ports::{CancellationReceiver, TokenService};
use crate::{ApplicationError, ApplicationResult};

/// Use case for obtaining an access token.
///
/// # Example
///
/// ```ignore
/// let use_case = RequestToken::new(Arc::new(token_client));
/// let request = TokenRequest::password(Credential::new("user", "secret", "app-key"));
/// let token = use_case.execute(&request).await?;
/// ```
pub struct RequestToken<S: TokenService + ?Sized> {
    service: Arc<S>,
}

impl<S: TokenService + ?Sized> RequestToken<S> {
    /// Creates a new `RequestToken` use case with the given token service.
    pub const fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    /// Requests a token.
    ///
    /// # Errors
    ///
    /// Propagates the token service's error unchanged.
    pub async fn execute(&self, request: &TokenRequest) -> ApplicationResult<Token> {
        tracing::debug!(
            username = %request.credential.username,
            grant = request.grant.grant_type(),
            "requesting token"
        );

        let result = self.service.request_token(request).await;
        if let Err(error) = &result {
            tracing::warn!(
                username = %request.credential.username,
                grant = request.grant.grant_type(),
                %error,
                "token request failed"
            );
        }
        result
    }

    /// Requests a token, aborting the whole exchange on cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Cancelled`] if cancelled first.
    pub async fn execute_with_cancellation(
        &self,
        request: &TokenRequest,
        mut cancel: CancellationReceiver,
    ) -> ApplicationResult<Token> {
        tokio::select! {
            result = self.execute(request) => result,
            () = cancel.cancelled() => Err(ApplicationError::Cancelled),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ports::CancellationToken;
    use crate::testing::StubTokenService;
    use pretty_assertions::assert_eq;
    use rdpgate_domain::{AuthError, Credential};
    use std::time::Duration;

    fn request() -> TokenRequest {
        TokenRequest::password(Credential::new("user", "secret", "app"))
    }

    #[tokio::test]
    async fn test_execute_success() {
        let token = Token {
            access_token: Some("abc".to_string()),
            ..Token::default()
        };
        let service = Arc::new(StubTokenService::new(Ok(token.clone())));
        let use_case = RequestToken::new(Arc::clone(&service));

        assert_eq!(use_case.execute(&request()).await.unwrap(), token);
        assert_eq!(service.requests.lock().unwrap().as_slice(), &[request()]);
    }

    #[tokio::test]
    async fn test_execute_auth_error_is_passed_through() {
        let rejection = AuthError {
            error: Some("invalid_grant".to_string()),
            ..AuthError::from_status(400, None)
        };
        let service = Arc::new(StubTokenService::new(Err(ApplicationError::Auth(
            rejection.clone(),
        ))));
        let use_case = RequestToken::new(service);

        let err = use_case.execute(&request()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Auth(e) if e == rejection));
    }

    #[tokio::test]
    async fn test_cancellation_aborts_request() {
        let mut service = StubTokenService::new(Ok(Token::default()));
        service.delay = Duration::from_secs(30);
        let use_case = RequestToken::new(Arc::new(service));

        let (token, receiver) = CancellationToken::new();
        token.cancel();

        let err = use_case
            .execute_with_cancellation(&request(), receiver)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Cancelled));
    }
}
