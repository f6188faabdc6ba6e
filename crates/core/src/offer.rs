//! An Offer: a proposal attached to exactly one Publication, carrying money
//! and/or cards owned by the proposer.
//!
//! Offers never reach into their Publication; the Publication is the sole
//! entity authorized to change an Offer's status, and all orchestration
//! happens from the Publication or the service layer.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::DomainError;
use crate::ownership::Owned;
use crate::types::{Cents, DbId, Timestamp};

/// Lifecycle status of an offer.
///
/// PENDING (or DRAFT when explicitly requested) at creation; exactly one of
/// ACCEPTED or REJECTED afterwards, both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Draft,
    Pending,
    Accepted,
    Rejected,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Draft => "draft",
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "draft" => Ok(OfferStatus::Draft),
            "pending" => Ok(OfferStatus::Pending),
            "accepted" => Ok(OfferStatus::Accepted),
            "rejected" => Ok(OfferStatus::Rejected),
            other => Err(DomainError::Validation(format!(
                "unknown offer status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Offer {
    pub id: DbId,
    pub publication_id: DbId,
    owned: Owned,
    money_offer: Option<Cents>,
    cards: Vec<Card>,
    status: OfferStatus,
    pub closed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Offer {
    /// Construct a new offer, enforcing the construction invariants:
    ///
    /// - at least one of `money_offer` (> 0) or `cards` must be present;
    /// - every offered card must currently be owned by `owner_id`.
    ///
    /// The no-self-trade rule is enforced at attachment time by
    /// [`Publication::add_offer`](crate::publication::Publication::add_offer),
    /// where the publication's owner is known.
    pub fn new(
        id: DbId,
        publication_id: DbId,
        owner_id: DbId,
        money_offer: Option<Cents>,
        cards: Vec<Card>,
        draft: bool,
    ) -> Result<Self, DomainError> {
        if let Some(amount) = money_offer {
            if amount <= 0 {
                return Err(DomainError::InvalidOperation(format!(
                    "money offer must be positive, got {amount}"
                )));
            }
        }
        if money_offer.is_none() && cards.is_empty() {
            return Err(DomainError::InvalidOperation(
                "an offer must include money, cards, or both".into(),
            ));
        }
        Owned::must_all_belong_to(&cards, owner_id)?;

        let now = Utc::now();
        Ok(Self {
            id,
            publication_id,
            owned: Owned::new(owner_id),
            money_offer,
            cards,
            status: if draft { OfferStatus::Draft } else { OfferStatus::Pending },
            closed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate an offer from storage, bypassing construction invariants
    /// (they held at creation time; ownership of the cards may legitimately
    /// have moved since if a competing offer settled first).
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: DbId,
        publication_id: DbId,
        owner_id: DbId,
        money_offer: Option<Cents>,
        cards: Vec<Card>,
        status: OfferStatus,
        closed_at: Option<Timestamp>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            publication_id,
            owned: Owned::new(owner_id),
            money_offer,
            cards,
            status,
            closed_at,
            created_at,
            updated_at,
        }
    }

    pub fn owner_id(&self) -> DbId {
        self.owned.owner_id()
    }

    pub fn owned(&self) -> &Owned {
        &self.owned
    }

    pub fn status(&self) -> OfferStatus {
        self.status
    }

    pub fn money_offer(&self) -> Option<Cents> {
        self.money_offer
    }

    /// Read-only view of the offered cards.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Promote a DRAFT offer to PENDING so it becomes a live competitor.
    pub fn submit(&mut self) -> Result<(), DomainError> {
        if self.status != OfferStatus::Draft {
            return Err(DomainError::InvalidState(format!(
                "offer {} is {}, only a draft offer can be submitted",
                self.id,
                self.status.as_str()
            )));
        }
        self.status = OfferStatus::Pending;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Accept this offer: reassign every offered card to `new_owner` (the
    /// publication's original owner) and return the ids of the cards whose
    /// ownership changed (empty if the offer carried no cards).
    ///
    /// Fails with `InvalidState` unless the offer is PENDING. Called only by
    /// `Publication::accept_offer`.
    pub(crate) fn accept(&mut self, new_owner: DbId) -> Result<Vec<DbId>, DomainError> {
        if self.status != OfferStatus::Pending {
            return Err(DomainError::InvalidState(format!(
                "offer {} cannot be accepted from status {}",
                self.id,
                self.status.as_str()
            )));
        }
        self.status = OfferStatus::Accepted;
        let now = Utc::now();
        self.updated_at = now;
        self.closed_at = Some(now);

        let mut moved = Vec::with_capacity(self.cards.len());
        for card in &mut self.cards {
            card.set_owner(new_owner);
            moved.push(card.id);
        }
        Ok(moved)
    }

    /// Reject this offer. Fails with `InvalidState` unless PENDING; a
    /// second rejection signals a settlement-logic bug upstream and is never
    /// silently ignored.
    pub(crate) fn reject(&mut self) -> Result<(), DomainError> {
        if self.status != OfferStatus::Pending {
            return Err(DomainError::InvalidState(format!(
                "offer {} cannot be rejected from status {}",
                self.id,
                self.status.as_str()
            )));
        }
        self.status = OfferStatus::Rejected;
        let now = Utc::now();
        self.updated_at = now;
        self.closed_at = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn card(id: DbId, owner: DbId) -> Card {
        Card::new(id, "Exodia the Forbidden One".into(), 80, None, owner)
    }

    #[test]
    fn empty_offer_is_invalid() {
        let err = Offer::new(1, 1, 2, None, vec![], false).unwrap_err();
        assert_matches!(err, DomainError::InvalidOperation(_));
    }

    #[test]
    fn non_positive_money_is_invalid() {
        assert_matches!(
            Offer::new(1, 1, 2, Some(0), vec![], false),
            Err(DomainError::InvalidOperation(_))
        );
        assert_matches!(
            Offer::new(1, 1, 2, Some(-500), vec![], false),
            Err(DomainError::InvalidOperation(_))
        );
    }

    #[test]
    fn offering_a_foreign_card_is_invalid_and_names_it() {
        let err = Offer::new(1, 1, 2, None, vec![card(42, 3)], false).unwrap_err();
        assert_matches!(&err, DomainError::InvalidOperation(msg) if msg.contains("42"));
    }

    #[test]
    fn money_only_offer_is_valid() {
        let offer = Offer::new(1, 1, 2, Some(10_000), vec![], false).unwrap();
        assert_eq!(offer.status(), OfferStatus::Pending);
        assert!(offer.cards().is_empty());
    }

    #[test]
    fn cards_only_offer_is_valid() {
        let offer = Offer::new(1, 1, 2, None, vec![card(5, 2)], false).unwrap();
        assert_eq!(offer.status(), OfferStatus::Pending);
    }

    #[test]
    fn draft_flag_creates_draft() {
        let offer = Offer::new(1, 1, 2, Some(100), vec![], true).unwrap();
        assert_eq!(offer.status(), OfferStatus::Draft);
    }

    #[test]
    fn accept_moves_every_card_and_reports_them() {
        let mut offer =
            Offer::new(1, 1, 2, Some(100), vec![card(5, 2), card(6, 2)], false).unwrap();
        let moved = offer.accept(9).unwrap();
        assert_eq!(moved, vec![5, 6]);
        assert!(offer.cards().iter().all(|c| c.owner_id() == 9));
        assert_eq!(offer.status(), OfferStatus::Accepted);
        assert!(offer.closed_at.is_some());
    }

    #[test]
    fn accept_of_money_only_offer_moves_nothing() {
        let mut offer = Offer::new(1, 1, 2, Some(100), vec![], false).unwrap();
        assert!(offer.accept(9).unwrap().is_empty());
    }

    #[test]
    fn accept_twice_is_invalid_state() {
        let mut offer = Offer::new(1, 1, 2, Some(100), vec![], false).unwrap();
        offer.accept(9).unwrap();
        assert_matches!(offer.accept(9), Err(DomainError::InvalidState(_)));
    }

    #[test]
    fn reject_twice_is_invalid_state() {
        let mut offer = Offer::new(1, 1, 2, Some(100), vec![], false).unwrap();
        offer.reject().unwrap();
        assert_matches!(offer.reject(), Err(DomainError::InvalidState(_)));
    }

    #[test]
    fn draft_cannot_be_accepted_until_submitted() {
        let mut offer = Offer::new(1, 1, 2, Some(100), vec![], true).unwrap();
        assert_matches!(offer.accept(9), Err(DomainError::InvalidState(_)));
        offer.submit().unwrap();
        assert!(offer.accept(9).is_ok());
    }

    #[test]
    fn submit_of_non_draft_is_invalid_state() {
        let mut offer = Offer::new(1, 1, 2, Some(100), vec![], false).unwrap();
        assert_matches!(offer.submit(), Err(DomainError::InvalidState(_)));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for s in [
            OfferStatus::Draft,
            OfferStatus::Pending,
            OfferStatus::Accepted,
            OfferStatus::Rejected,
        ] {
            assert_eq!(OfferStatus::parse(s.as_str()).unwrap(), s);
        }
        assert_matches!(OfferStatus::parse("open"), Err(DomainError::Validation(_)));
    }
}
