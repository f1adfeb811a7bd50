use axum::Json;
use axum::extract::{Query, State};
use rdpgate_domain::UniverseRecord;

use crate::error::ApiError;
use crate::params::SearchParams;
use crate::state::AppState;

/// `GET /api/SearchUniverse`
///
/// Returns an empty array when nothing is cached for the identity.
pub async fn search_universe(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<UniverseRecord>>, ApiError> {
    let input = params.into_input()?;
    let records = state.search_universe.execute(&input).await?;
    Ok(Json(records))
}
