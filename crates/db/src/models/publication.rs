//! Publication entity model and DTOs.

use deckswap_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full publication row from the `publications` table.
///
/// The offer registry is not embedded in the row; repositories load it
/// separately when the full aggregate is required.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Publication {
    pub id: DbId,
    pub owner_id: DbId,
    pub card_id: DbId,
    pub wanted_archetypes: Vec<String>,
    pub ask_price: Option<Cents>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new publication. The owner is the authenticated caller.
#[derive(Debug, Deserialize)]
pub struct CreatePublication {
    pub card_id: DbId,
    #[serde(default)]
    pub wanted_archetypes: Vec<String>,
    pub ask_price: Option<Cents>,
}
