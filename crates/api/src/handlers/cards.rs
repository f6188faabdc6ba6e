//! Card CRUD. Cards are created into the caller's collection; ownership
//! only ever changes through settlement.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use deckswap_core::types::DbId;
use deckswap_core::{Card, DomainError};
use deckswap_db::models::card::CreateCard;
use deckswap_db::repositories::CardRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/cards
pub async fn create_card(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCard>,
) -> AppResult<impl IntoResponse> {
    Card::validate_condition(input.condition_score)?;
    if input.archetype.trim().is_empty() {
        return Err(DomainError::Validation("archetype must not be empty".into()).into());
    }

    let card = CardRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(user_id = auth.user_id, card_id = card.id, "Card created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: card })))
}

/// GET /api/v1/cards: the caller's collection.
pub async fn list_my_cards(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let cards = CardRepo::list_by_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: cards }))
}

/// GET /api/v1/cards/{card_id}
pub async fn get_card(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(card_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let card = CardRepo::find_by_id(&state.pool, card_id)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "Card",
            id: card_id,
        })?;
    Ok(Json(DataResponse { data: card }))
}
