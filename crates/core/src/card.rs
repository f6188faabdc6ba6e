//! The traded unit. A Card is inert data plus a mutable owner reference;
//! reassigning that reference is the only way a trade manifests. A card's
//! identity is stable across ownership changes.

use chrono::Utc;

use crate::error::DomainError;
use crate::ownership::Owned;
use crate::types::{DbId, Timestamp};

/// Lowest acceptable condition score.
pub const CONDITION_MIN: i16 = 0;
/// Highest acceptable condition score.
pub const CONDITION_MAX: i16 = 100;

#[derive(Debug, Clone)]
pub struct Card {
    pub id: DbId,
    pub archetype: String,
    pub condition_score: i16,
    pub image_url: Option<String>,
    owned: Owned,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Card {
    pub fn new(
        id: DbId,
        archetype: String,
        condition_score: i16,
        image_url: Option<String>,
        owner_id: DbId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            archetype,
            condition_score,
            image_url,
            owned: Owned::new(owner_id),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a card from storage with its original timestamps.
    pub fn from_parts(
        id: DbId,
        archetype: String,
        condition_score: i16,
        image_url: Option<String>,
        owner_id: DbId,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            archetype,
            condition_score,
            image_url,
            owned: Owned::new(owner_id),
            created_at,
            updated_at,
        }
    }

    /// Validate a condition score against the 0–100 scale.
    pub fn validate_condition(score: i16) -> Result<(), DomainError> {
        if (CONDITION_MIN..=CONDITION_MAX).contains(&score) {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "condition_score must be between {CONDITION_MIN} and {CONDITION_MAX}, got {score}"
            )))
        }
    }

    pub fn owner_id(&self) -> DbId {
        self.owned.owner_id()
    }

    pub fn owned(&self) -> &Owned {
        &self.owned
    }

    /// Unconditional ownership reassignment. Called only by the settlement
    /// transition (`Offer::accept` / `Publication::accept_offer`), never by
    /// request handlers.
    pub(crate) fn set_owner(&mut self, new_owner: DbId) {
        self.owned.reassign(new_owner);
        self.updated_at = Utc::now();
    }
}
