use axum::{Json, extract::State};

use crate::AppState;
use crate::models::query::{QueryRequest, QueryResponse};

/// Run a batch of targets. Upstream failures are reported inside the
/// affected target's frame, so this always answers 200.
pub async fn execute_query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Json<QueryResponse> {
    tracing::debug!(targets = req.targets.len(), "query request");
    Json(state.datasource.query(&req).await)
}
