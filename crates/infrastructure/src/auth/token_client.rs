//! Credential exchange against the platform's OAuth2 token endpoint.
//!
//! Implements the password and refresh-token grants. The form body is built
//! once per logical request and replayed byte-for-byte on every redirect hop.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use rdpgate_application::{ApplicationError, ApplicationResult, TokenService};
use rdpgate_domain::{AuthError, GrantKind, Token, TokenRequest};
use serde::Deserialize;
use url::Url;

use crate::adapters::{PlatformResponse, RedirectingHttpClient};
use crate::config::PlatformConfig;

/// Content-Type for form-urlencoded data.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The only status that carries an issued token.
const TOKEN_ISSUED: u16 = 200;

/// Error payload of the token endpoint.
#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error_uri: Option<String>,
}

/// Token endpoint client.
#[derive(Debug, Clone)]
pub struct TokenClient {
    http: RedirectingHttpClient,
    endpoint: Url,
}

impl TokenClient {
    /// Creates a client posting to `endpoint`.
    #[must_use]
    pub const fn new(http: RedirectingHttpClient, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// Creates a client from platform settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint does not parse or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &PlatformConfig) -> ApplicationResult<Self> {
        Ok(Self::new(RedirectingHttpClient::new(config)?, config.auth_endpoint()?))
    }

    /// The configured token endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Ordered form fields for a token request.
    fn form_fields(request: &TokenRequest) -> Vec<(&'static str, &str)> {
        let credential = &request.credential;
        match &request.grant {
            GrantKind::Password => vec![
                ("username", credential.username.as_str()),
                ("client_id", credential.client_id.as_str()),
                ("takeExclusiveSignOnControl", "True"),
                ("scope", credential.scope.as_str()),
                ("grant_type", request.grant.grant_type()),
                ("password", credential.secret.as_str()),
            ],
            GrantKind::RefreshToken { refresh_token } => vec![
                ("username", credential.username.as_str()),
                ("client_id", credential.client_id.as_str()),
                ("grant_type", request.grant.grant_type()),
                ("refresh_token", refresh_token.as_str()),
            ],
        }
    }

    fn encode_form(request: &TokenRequest) -> ApplicationResult<String> {
        serde_urlencoded::to_string(Self::form_fields(request)).map_err(|e| {
            ApplicationError::MalformedResponse(format!("failed to encode token form: {e}"))
        })
    }

    /// Interprets the final response of a token request.
    ///
    /// Only 200 carries a token; any other status is a rejection.
    fn interpret(response: &PlatformResponse) -> ApplicationResult<Token> {
        if response.status == TOKEN_ISSUED {
            if response.body_is_blank() {
                return Ok(Token::default());
            }
            return serde_json::from_slice(&response.body).map_err(|e| {
                ApplicationError::MalformedResponse(format!("token response: {e}"))
            });
        }

        if response.body_is_blank() {
            return Err(AuthError::from_status(response.status, response.reason.clone()).into());
        }

        let body: AuthErrorBody = serde_json::from_slice(&response.body).map_err(|e| {
            ApplicationError::MalformedResponse(format!(
                "token error response (status {}): {e}",
                response.status
            ))
        })?;

        Err(AuthError {
            error: body.error,
            error_description: body.error_description,
            error_uri: body.error_uri,
            status: response.status,
            reason: response.reason.clone(),
        }
        .into())
    }
}

#[async_trait]
impl TokenService for TokenClient {
    async fn request_token(&self, request: &TokenRequest) -> ApplicationResult<Token> {
        let body = Self::encode_form(request)?;

        tracing::debug!(
            grant_type = request.grant.grant_type(),
            endpoint = %self.endpoint,
            "requesting token"
        );

        let response = self
            .http
            .send(self.endpoint.clone(), |client, url| {
                client
                    .post(url)
                    .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                    .body(body.clone())
            })
            .await?;

        let result = Self::interpret(&response);
        if let Err(ApplicationError::Auth(error)) = &result {
            tracing::warn!(status = error.status, error = ?error.error, "token request rejected");
        }
        result
    }
}
