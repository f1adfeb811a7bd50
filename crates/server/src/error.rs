//! Startup errors and the HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rdpgate_application::ApplicationError;
use rdpgate_domain::DomainError;
use serde::Serialize;

/// Errors that stop the gateway from starting or serving.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// An adapter could not be constructed.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Host and port do not form a socket address.
    #[error("invalid listen address: {0}")]
    InvalidAddress(String),

    /// Binding or serving failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Error returned by handlers.
///
/// Platform rejections are forwarded with the platform's status and payload;
/// everything else becomes `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        Self(error)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(ApplicationError::Domain(error))
    }
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ApplicationError::Auth(error) => platform_status(error.status),
            ApplicationError::Data(error) => platform_status(error.http_status),
            ApplicationError::Transport { .. }
            | ApplicationError::RedirectExhausted { .. }
            | ApplicationError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            ApplicationError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ApplicationError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            ApplicationError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApplicationError::Domain(_) | ApplicationError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Forwards 4xx/5xx platform statuses; anything else is a bad gateway.
fn platform_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self.0 {
            ApplicationError::Auth(error) => (status, Json(error)).into_response(),
            ApplicationError::Data(error) => (status, Json(error)).into_response(),
            other => {
                if status.is_server_error() {
                    tracing::error!(error = %other, status = %status, "request failed");
                }
                (
                    status,
                    Json(ErrorResponse {
                        error: other.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
