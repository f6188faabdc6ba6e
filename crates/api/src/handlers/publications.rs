//! Publication endpoints: listing creation, browsing, and cancellation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use deckswap_core::types::DbId;
use deckswap_core::DomainError;
use deckswap_db::models::offer::OfferWithCards;
use deckswap_db::models::publication::{CreatePublication, Publication};
use deckswap_db::repositories::{OfferRepo, PublicationRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Optional status filter: `open` or `closed`.
    pub status: Option<String>,
}

/// A publication with its full offer registry, as returned by the detail
/// endpoint.
#[derive(Debug, Serialize)]
pub struct PublicationDetail {
    #[serde(flatten)]
    pub publication: Publication,
    pub offers: Vec<OfferWithCards>,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    #[serde(flatten)]
    pub publication: Publication,
    pub rejected_offer_ids: Vec<DbId>,
}

/// POST /api/v1/publications
pub async fn create_publication(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePublication>,
) -> AppResult<impl IntoResponse> {
    let publication = state.publications.create(auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: publication })))
}

/// GET /api/v1/publications
pub async fn list_publications(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = query.status.as_deref() {
        // Reject unknown filters early instead of returning an empty list.
        deckswap_core::PublicationStatus::parse(status)?;
    }
    let publications = PublicationRepo::list(&state.pool, query.status.as_deref()).await?;
    Ok(Json(DataResponse { data: publications }))
}

/// GET /api/v1/publications/{publication_id}
pub async fn get_publication(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(publication_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let publication = PublicationRepo::find_by_id(&state.pool, publication_id)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "Publication",
            id: publication_id,
        })?;

    let mut offers = Vec::new();
    for offer in OfferRepo::list_for_publication(&state.pool, publication_id).await? {
        let card_ids = OfferRepo::card_ids(&state.pool, offer.id).await?;
        offers.push(OfferWithCards { offer, card_ids });
    }

    Ok(Json(DataResponse {
        data: PublicationDetail {
            publication,
            offers,
        },
    }))
}

/// POST /api/v1/publications/{publication_id}/cancel
pub async fn cancel_publication(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(publication_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (publication, rejected_offer_ids) =
        state.publications.cancel(auth.user_id, publication_id).await?;
    Ok(Json(DataResponse {
        data: CancelResponse {
            publication,
            rejected_offer_ids,
        },
    }))
}
