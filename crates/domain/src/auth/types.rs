//! Credential exchange types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::{DomainError, DomainResult};

/// Scope requested by the password grant when the caller does not name one.
pub const DEFAULT_SCOPE: &str = "trapi";

/// Token type assumed when the platform or the caller omits one.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Credentials presented to the auth endpoint.
///
/// Used for exactly one token request and never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Platform username or machine id.
    pub username: String,
    /// Password for the password grant. Unused by the refresh grant.
    pub secret: String,
    /// Client identifier (app key).
    pub client_id: String,
    /// Requested scope. Unused by the refresh grant.
    pub scope: String,
}

impl Credential {
    /// Creates a credential with the default scope.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        secret: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
            client_id: client_id.into(),
            scope: DEFAULT_SCOPE.to_string(),
        }
    }

    /// Replaces the requested scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("scope", &self.scope)
            .finish()
    }
}

/// The credential-exchange mode of a token request.
#[derive(Clone, PartialEq, Eq)]
pub enum GrantKind {
    /// Resource owner password grant.
    Password,
    /// Refresh-token grant.
    RefreshToken {
        /// Refresh token issued by an earlier grant.
        refresh_token: String,
    },
}

impl GrantKind {
    /// The `grant_type` form value for this grant.
    #[must_use]
    pub const fn grant_type(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::RefreshToken { .. } => "refresh_token",
        }
    }
}

impl std::fmt::Debug for GrantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Password => write!(f, "Password"),
            Self::RefreshToken { .. } => write!(f, "RefreshToken(<redacted>)"),
        }
    }
}

/// A single logical token request, replayed unchanged across redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    /// Who is asking.
    pub credential: Credential,
    /// How they are asking.
    pub grant: GrantKind,
}

impl TokenRequest {
    /// Creates a password-grant request.
    #[must_use]
    pub const fn password(credential: Credential) -> Self {
        Self {
            credential,
            grant: GrantKind::Password,
        }
    }

    /// Creates a refresh-token-grant request.
    #[must_use]
    pub fn refresh(credential: Credential, refresh_token: impl Into<String>) -> Self {
        Self {
            credential,
            grant: GrantKind::RefreshToken {
                refresh_token: refresh_token.into(),
            },
        }
    }
}

/// Caller-held access token presented to data endpoints.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessGrant {
    /// The access token string.
    pub access_token: String,
    /// Authorization scheme, e.g. "Bearer".
    pub token_type: String,
}

impl AccessGrant {
    /// Creates a grant, defaulting the token type to [`DEFAULT_TOKEN_TYPE`].
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingField`] if the access token is blank.
    pub fn new(access_token: impl Into<String>, token_type: Option<&str>) -> DomainResult<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(DomainError::MissingField("token"));
        }
        let token_type = token_type
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TOKEN_TYPE);
        Ok(Self {
            access_token,
            token_type: token_type.to_string(),
        })
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl std::fmt::Debug for AccessGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGrant")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Access token issued by the auth endpoint.
///
/// Every field is optional: a field missing from the platform payload stays
/// `None` rather than being defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Token {
    /// The access token string.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Lifetime in seconds from issuance.
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub expires_in: Option<u64>,
    /// Refresh token for the refresh grant.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Space-separated granted scope.
    #[serde(default)]
    pub scope: Option<String>,
    /// Token type, usually "Bearer".
    #[serde(default)]
    pub token_type: Option<String>,
}

impl Token {
    /// Returns the `Authorization` header value, if an access token is present.
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        let access_token = self.access_token.as_deref()?;
        let token_type = self.token_type.as_deref().unwrap_or(DEFAULT_TOKEN_TYPE);
        Some(format!("{token_type} {access_token}"))
    }

    /// Granted scopes, split on whitespace.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scope
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Absolute expiry for a token issued at `issued_at`, if a lifetime was given.
    #[must_use]
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.expires_in?).ok()?;
        issued_at.checked_add_signed(chrono::Duration::try_seconds(secs)?)
    }
}

/// Credential rejection reported by the auth endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthError {
    /// Platform error code, e.g. `invalid_grant`.
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable description.
    #[serde(default)]
    pub error_description: Option<String>,
    /// Reference URI for the error.
    #[serde(default)]
    pub error_uri: Option<String>,
    /// HTTP status of the rejecting response.
    #[serde(default)]
    pub status: u16,
    /// HTTP reason phrase of the rejecting response.
    #[serde(default)]
    pub reason: Option<String>,
}

impl AuthError {
    /// Creates an error carrying only HTTP status information.
    #[must_use]
    pub fn from_status(status: u16, reason: Option<String>) -> Self {
        Self {
            status,
            reason,
            ..Self::default()
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "auth endpoint returned {}", self.status)?;
        if let Some(reason) = &self.reason {
            write!(f, " {reason}")?;
        }
        match (&self.error, &self.error_description) {
            (Some(error), Some(description)) => write!(f, ": {error} ({description})"),
            (Some(error), None) => write!(f, ": {error}"),
            (None, Some(description)) => write!(f, ": {description}"),
            (None, None) => Ok(()),
        }
    }
}

impl std::error::Error for AuthError {}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_token_full_payload() {
        let json = r#"{
            "access_token": "abc",
            "expires_in": "300",
            "refresh_token": "def",
            "scope": "trapi.data trapi.auth",
            "token_type": "Bearer"
        }"#;
        let token: Token = serde_json::from_str(json).unwrap();

        assert_eq!(token.access_token.as_deref(), Some("abc"));
        assert_eq!(token.expires_in, Some(300));
        assert_eq!(token.refresh_token.as_deref(), Some("def"));
        assert_eq!(token.scopes(), vec!["trapi.data", "trapi.auth"]);
        assert_eq!(token.authorization_header().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn test_token_absent_fields_stay_unset() {
        let token: Token = serde_json::from_str(r#"{"access_token": "abc"}"#).unwrap();
        assert_eq!(
            token,
            Token {
                access_token: Some("abc".to_string()),
                ..Token::default()
            }
        );
        assert_eq!(token.authorization_header().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn test_token_without_access_token_has_no_header() {
        assert!(Token::default().authorization_header().is_none());
    }

    #[test]
    fn test_expires_at() {
        let issued_at = Utc::now();
        let token = Token {
            expires_in: Some(600),
            ..Token::default()
        };
        let expires_at = token.expires_at(issued_at).unwrap();
        assert_eq!((expires_at - issued_at).num_seconds(), 600);
        assert!(Token::default().expires_at(issued_at).is_none());
    }

    #[test]
    fn test_grant_types() {
        let credential = Credential::new("user", "pw", "app");
        assert_eq!(credential.scope, DEFAULT_SCOPE);

        let request = TokenRequest::password(credential.clone());
        assert_eq!(request.grant.grant_type(), "password");

        let request = TokenRequest::refresh(credential, "r1");
        assert_eq!(request.grant.grant_type(), "refresh_token");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let request = TokenRequest::refresh(Credential::new("user", "hunter2", "app"), "r-secret");
        let debug = format!("{request:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("r-secret"));
        assert!(debug.contains("user"));
    }

    #[test]
    fn test_access_grant_defaults_and_validation() {
        let grant = AccessGrant::new("abc", None).unwrap();
        assert_eq!(grant.authorization_header(), "Bearer abc");

        let grant = AccessGrant::new("abc", Some("  ")).unwrap();
        assert_eq!(grant.token_type, "Bearer");

        let grant = AccessGrant::new("abc", Some("MAC")).unwrap();
        assert_eq!(grant.authorization_header(), "MAC abc");

        assert_eq!(
            AccessGrant::new(" ", None),
            Err(DomainError::MissingField("token"))
        );
    }

    #[test]
    fn test_auth_error_display() {
        let error = AuthError {
            error: Some("invalid_grant".to_string()),
            error_description: Some("Invalid username or password.".to_string()),
            ..AuthError::from_status(400, Some("Bad Request".to_string()))
        };
        assert_eq!(
            error.to_string(),
            "auth endpoint returned 400 Bad Request: invalid_grant (Invalid username or password.)"
        );
        assert_eq!(
            AuthError::from_status(503, None).to_string(),
            "auth endpoint returned 503"
        );
    }
}
