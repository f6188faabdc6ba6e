//! Route definitions for the card collection.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::cards;
use crate::state::AppState;

/// ```text
/// POST   /              create_card
/// GET    /              list_my_cards
/// GET    /{card_id}     get_card
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(cards::create_card).get(cards::list_my_cards))
        .route("/{card_id}", get(cards::get_card))
}
