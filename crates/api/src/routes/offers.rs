//! Route definitions for offer settlement transitions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::offers;
use crate::state::AppState;

/// ```text
/// GET    /{offer_id}           get_offer
/// PATCH  /{offer_id}           update_offer
/// POST   /{offer_id}/accept    accept_offer
/// POST   /{offer_id}/reject    reject_offer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{offer_id}",
            get(offers::get_offer).patch(offers::update_offer),
        )
        .route("/{offer_id}/accept", post(offers::accept_offer))
        .route("/{offer_id}/reject", post(offers::reject_offer))
}
