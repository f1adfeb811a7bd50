//! `GetESGUniverse` endpoint.

use axum::Json;
use axum::extract::{Query, State};
use rdpgate_domain::UniverseSnapshot;
use serde::Serialize;

use crate::error::ApiError;
use crate::params::UniverseParams;
use crate::state::AppState;

/// Fetched universe, in the same shape as the cached value.
#[derive(Debug, Serialize)]
pub struct UniverseResponse {
    /// Count, headers and records.
    #[serde(flatten)]
    pub snapshot: UniverseSnapshot,
    /// True if the snapshot was written to the cache.
    #[serde(rename = "cacheUpdated")]
    pub cache_updated: bool,
}

/// `GET /api/GetESGUniverse`
pub async fn get_universe(
    State(state): State<AppState>,
    Query(params): Query<UniverseParams>,
) -> Result<Json<UniverseResponse>, ApiError> {
    fetch(&state, params).await
}

/// `POST /api/GetESGUniverse`
pub async fn post_universe(
    State(state): State<AppState>,
    Json(params): Json<UniverseParams>,
) -> Result<Json<UniverseResponse>, ApiError> {
    fetch(&state, params).await
}

async fn fetch(state: &AppState, params: UniverseParams) -> Result<Json<UniverseResponse>, ApiError> {
    let input = params.into_input()?;

    let output = state
        .fetch_universe
        .execute_with_cancellation(&input, state.shutdown.clone())
        .await?;

    Ok(Json(UniverseResponse {
        snapshot: output.snapshot,
        cache_updated: output.cache_updated,
    }))
}
