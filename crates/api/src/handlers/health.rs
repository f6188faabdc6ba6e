//! Liveness and readiness.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /health
///
/// Confirms the process is up and the database answers a trivial query.
pub async fn health(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    deckswap_db::health_check(&state.pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}
