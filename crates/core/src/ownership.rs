//! The ownership primitive shared by Card, Offer, and Publication.
//!
//! Every owned entity holds an [`Owned`] by composition and delegates its
//! "who owns me / may the caller act on me" checks to it. All checks are
//! pure: they reject with a [`DomainError`] but never mutate state.

use crate::card::Card;
use crate::error::DomainError;
use crate::types::DbId;

/// Value type carrying an entity's owner reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owned {
    owner_id: DbId,
}

impl Owned {
    pub fn new(owner_id: DbId) -> Self {
        Self { owner_id }
    }

    /// The current owner's user id.
    pub fn owner_id(&self) -> DbId {
        self.owner_id
    }

    /// Reassign the owner. Crate-internal: only settlement paths may move
    /// ownership, request handlers never call this directly.
    pub(crate) fn reassign(&mut self, new_owner: DbId) {
        self.owner_id = new_owner;
    }

    /// Fail with `PermissionDenied` unless `caller` owns this entity.
    ///
    /// `subject` names the entity in the error message (e.g. `"publication"`).
    pub fn validate_ownership(&self, caller: DbId, subject: &str) -> Result<(), DomainError> {
        if caller == self.owner_id {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied(format!(
                "user {caller} does not own this {subject}"
            )))
        }
    }

    /// Fail with `InvalidOperation` if both entities share an owner.
    ///
    /// Used to forbid self-trades: an offer's owner must differ from the
    /// publication's owner.
    pub fn must_differ(&self, other: &Owned, label_a: &str, label_b: &str) -> Result<(), DomainError> {
        if self.owner_id == other.owner_id {
            Err(DomainError::InvalidOperation(format!(
                "{label_a} and {label_b} must have different owners"
            )))
        } else {
            Ok(())
        }
    }

    /// Fail with `InvalidOperation` unless every card is owned by
    /// `expected`, naming every offending card id.
    pub fn must_all_belong_to(cards: &[Card], expected: DbId) -> Result<(), DomainError> {
        let foreign: Vec<String> = cards
            .iter()
            .filter(|c| c.owner_id() != expected)
            .map(|c| c.id.to_string())
            .collect();

        if foreign.is_empty() {
            Ok(())
        } else {
            Err(DomainError::InvalidOperation(format!(
                "cards not owned by user {expected}: {}",
                foreign.join(", ")
            )))
        }
    }
}
