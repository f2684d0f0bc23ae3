use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MetadataParams {
    /// Drop the memoized value and fetch again.
    #[serde(default)]
    pub refresh: bool,
}

/// Distinct groups, devices, tags and sensor types for the editor's pickers.
pub async fn get_metadata(
    State(state): State<AppState>,
    Query(params): Query<MetadataParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let metadata = state
        .datasource
        .metadata(params.refresh)
        .await
        .map_err(|e| {
            tracing::error!("Metadata fetch failed: {e}");
            (StatusCode::BAD_GATEWAY, format!("metadata fetch failed: {e}"))
        })?;

    Ok(Json(metadata.as_ref().clone()))
}
