//! Admin-only marketplace statistics.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use deckswap_core::DomainError;
use deckswap_db::repositories::StatsRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/stats
///
/// Marketplace-wide counters. Requires the `is_admin` flag.
pub async fn get_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    if !auth.is_admin {
        return Err(DomainError::PermissionDenied(
            "statistics are restricted to administrators".into(),
        )
        .into());
    }

    let stats = StatsRepo::collect(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}
