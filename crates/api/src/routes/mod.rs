//! Route definitions, grouped per resource and merged under `/api/v1`.

pub mod auth;
pub mod cards;
pub mod health;
pub mod offers;
pub mod publications;
pub mod stats;

use axum::Router;

use crate::state::AppState;

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/cards", cards::router())
        .nest("/publications", publications::router())
        .nest("/offers", offers::router())
        .nest("/stats", stats::router())
}
