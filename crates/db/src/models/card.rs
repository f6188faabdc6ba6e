//! Card entity model and DTOs.

use deckswap_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full card row from the `cards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Card {
    pub id: DbId,
    pub archetype: String,
    pub condition_score: i16,
    pub image_url: Option<String>,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Card {
    /// Rehydrate the domain entity from this row.
    pub fn into_domain(self) -> deckswap_core::Card {
        deckswap_core::Card::from_parts(
            self.id,
            self.archetype,
            self.condition_score,
            self.image_url,
            self.owner_id,
            self.created_at,
            self.updated_at,
        )
    }
}

/// DTO for inserting a new card. The owner is the authenticated caller.
#[derive(Debug, Deserialize)]
pub struct CreateCard {
    pub archetype: String,
    pub condition_score: i16,
    pub image_url: Option<String>,
}
