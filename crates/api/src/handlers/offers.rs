//! Offer endpoints: creation against a publication and the settlement
//! transitions (accept / reject / status update).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use deckswap_core::types::DbId;
use deckswap_core::{DomainError, OfferStatus};
use deckswap_db::models::offer::{CreateOffer, OfferWithCards};
use deckswap_db::repositories::OfferRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateOfferRequest {
    pub status: OfferStatus,
}

/// POST /api/v1/publications/{publication_id}/offers
pub async fn create_offer(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(publication_id): Path<DbId>,
    Json(input): Json<CreateOffer>,
) -> AppResult<impl IntoResponse> {
    let offer = state
        .offers
        .create(auth.user_id, publication_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: offer })))
}

/// GET /api/v1/publications/{publication_id}/offers
pub async fn list_offers(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(publication_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut offers = Vec::new();
    for offer in OfferRepo::list_for_publication(&state.pool, publication_id).await? {
        let card_ids = OfferRepo::card_ids(&state.pool, offer.id).await?;
        offers.push(OfferWithCards { offer, card_ids });
    }
    Ok(Json(DataResponse { data: offers }))
}

/// GET /api/v1/offers/{offer_id}
pub async fn get_offer(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(offer_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let offer = OfferRepo::find_by_id(&state.pool, offer_id)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "Offer",
            id: offer_id,
        })?;
    let card_ids = OfferRepo::card_ids(&state.pool, offer_id).await?;
    Ok(Json(DataResponse {
        data: OfferWithCards { offer, card_ids },
    }))
}

/// POST /api/v1/offers/{offer_id}/accept
///
/// Settles the trade: the publication closes, its card moves to the offer
/// owner, the offer's cards move to the publication owner, and every other
/// pending offer is rejected.
pub async fn accept_offer(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(offer_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let offer = state.offers.accept(auth.user_id, offer_id).await?;
    Ok(Json(DataResponse { data: offer }))
}

/// POST /api/v1/offers/{offer_id}/reject
pub async fn reject_offer(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(offer_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let offer = state.offers.reject(auth.user_id, offer_id).await?;
    Ok(Json(DataResponse { data: offer }))
}

/// PATCH /api/v1/offers/{offer_id}
///
/// Generic status update: `accepted`/`rejected` settle, `pending` submits a
/// draft, anything else is a no-op persist.
pub async fn update_offer(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(offer_id): Path<DbId>,
    Json(input): Json<UpdateOfferRequest>,
) -> AppResult<impl IntoResponse> {
    let offer = state
        .offers
        .update_status(auth.user_id, offer_id, input.status)
        .await?;
    Ok(Json(DataResponse { data: offer }))
}
