use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::AppState;
use crate::models::metadata::TestResult;

pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Connection test against the configured PRTG server.
pub async fn test_datasource(State(state): State<AppState>) -> Json<TestResult> {
    Json(state.datasource.test_datasource().await)
}
