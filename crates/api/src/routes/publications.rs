//! Route definitions for publications and their nested offer registry.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{offers, publications};
use crate::state::AppState;

/// ```text
/// POST   /                            create_publication
/// GET    /                            list_publications
/// GET    /{publication_id}            get_publication
/// POST   /{publication_id}/cancel     cancel_publication
/// POST   /{publication_id}/offers     create_offer
/// GET    /{publication_id}/offers     list_offers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(publications::create_publication).get(publications::list_publications),
        )
        .route("/{publication_id}", get(publications::get_publication))
        .route(
            "/{publication_id}/cancel",
            post(publications::cancel_publication),
        )
        .route(
            "/{publication_id}/offers",
            post(offers::create_offer).get(offers::list_offers),
        )
}
