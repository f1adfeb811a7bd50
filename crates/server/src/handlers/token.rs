//! `GetNewToken` endpoint.

use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use rdpgate_domain::Token;
use serde::Serialize;

use crate::error::ApiError;
use crate::params::TokenParams;
use crate::state::AppState;

/// Successful token exchange.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Token fields exactly as issued.
    #[serde(flatten)]
    pub token: Token,
    /// HTTP status of the platform response.
    pub status: u16,
    /// Reason phrase of the platform response.
    pub reason: &'static str,
    /// Absolute expiry derived from `expires_in`.
    pub expires_at: Option<DateTime<Utc>>,
}

/// `GET /api/GetNewToken`
pub async fn get_new_token(
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
) -> Result<Json<TokenResponse>, ApiError> {
    issue(&state, params).await
}

/// `POST /api/GetNewToken`
pub async fn post_new_token(
    State(state): State<AppState>,
    Json(params): Json<TokenParams>,
) -> Result<Json<TokenResponse>, ApiError> {
    issue(&state, params).await
}

async fn issue(state: &AppState, params: TokenParams) -> Result<Json<TokenResponse>, ApiError> {
    let request = params.into_request(&state.default_scope)?;
    let issued_at = Utc::now();

    let token = state
        .request_token
        .execute_with_cancellation(&request, state.shutdown.clone())
        .await?;

    Ok(Json(TokenResponse {
        expires_at: token.expires_at(issued_at),
        token,
        status: 200,
        reason: "OK",
    }))
}
