//! Offer entity model and DTOs.

use deckswap_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full offer row from the `offers` table. Offered cards live in the
/// `offer_cards` link table and are loaded alongside the row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Offer {
    pub id: DbId,
    pub publication_id: DbId,
    pub owner_id: DbId,
    pub money_offer: Option<Cents>,
    pub status: String,
    pub closed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An offer row together with the ids of its offered cards, as returned to
/// API clients.
#[derive(Debug, Clone, Serialize)]
pub struct OfferWithCards {
    #[serde(flatten)]
    pub offer: Offer,
    pub card_ids: Vec<DbId>,
}

/// Request body for creating an offer against a publication.
#[derive(Debug, Deserialize)]
pub struct CreateOffer {
    pub money_offer: Option<Cents>,
    #[serde(default)]
    pub card_ids: Vec<DbId>,
    /// Create the offer as a draft instead of a live (pending) competitor.
    #[serde(default)]
    pub draft: bool,
}
