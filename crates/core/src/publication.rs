//! The Publication: a listing of one card for trade and the registry of all
//! offers competing for it. This is the settlement state machine: the only
//! entity authorized to change an attached offer's status, and the unit the
//! orchestration layer serializes concurrent mutations against.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::DomainError;
use crate::offer::{Offer, OfferStatus};
use crate::ownership::Owned;
use crate::types::{Cents, DbId, Timestamp};

/// Lifecycle status of a publication. CLOSED is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationStatus {
    Open,
    Closed,
}

impl PublicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationStatus::Open => "open",
            PublicationStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "open" => Ok(PublicationStatus::Open),
            "closed" => Ok(PublicationStatus::Closed),
            other => Err(DomainError::Validation(format!(
                "unknown publication status '{other}'"
            ))),
        }
    }
}

/// A single card ownership reassignment produced by settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardTransfer {
    pub card_id: DbId,
    pub new_owner_id: DbId,
}

/// The complete outcome of accepting one offer: everything the orchestration
/// layer must persist.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub accepted_offer_id: DbId,
    pub rejected_offer_ids: Vec<DbId>,
    pub transferred_cards: Vec<CardTransfer>,
}

#[derive(Debug, Clone)]
pub struct Publication {
    pub id: DbId,
    owned: Owned,
    card: Card,
    wanted_archetypes: Vec<String>,
    ask_price: Option<Cents>,
    offers: Vec<Offer>,
    status: PublicationStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Publication {
    /// Construct an OPEN publication.
    ///
    /// Enforces the construction invariants: the listed card must be owned
    /// by the publication owner, a positive ask price where present, and at
    /// least one of `ask_price` / `wanted_archetypes`; a listing with
    /// nothing requested in return is invalid.
    pub fn new(
        id: DbId,
        owner_id: DbId,
        card: Card,
        wanted_archetypes: Vec<String>,
        ask_price: Option<Cents>,
    ) -> Result<Self, DomainError> {
        Owned::must_all_belong_to(std::slice::from_ref(&card), owner_id)?;
        if let Some(price) = ask_price {
            if price <= 0 {
                return Err(DomainError::InvalidOperation(format!(
                    "ask price must be positive, got {price}"
                )));
            }
        }
        if ask_price.is_none() && wanted_archetypes.is_empty() {
            return Err(DomainError::InvalidOperation(
                "a publication must request money, card archetypes, or both".into(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            owned: Owned::new(owner_id),
            card,
            wanted_archetypes,
            ask_price,
            offers: Vec::new(),
            status: PublicationStatus::Open,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate a publication aggregate from storage.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: DbId,
        owner_id: DbId,
        card: Card,
        wanted_archetypes: Vec<String>,
        ask_price: Option<Cents>,
        offers: Vec<Offer>,
        status: PublicationStatus,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owned: Owned::new(owner_id),
            card,
            wanted_archetypes,
            ask_price,
            offers,
            status,
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

    pub fn status(&self) -> PublicationStatus {
        self.status
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn ask_price(&self) -> Option<Cents> {
        self.ask_price
    }

    pub fn wanted_archetypes(&self) -> &[String] {
        &self.wanted_archetypes
    }

    /// Read-only view of the offer registry.
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn offer(&self, offer_id: DbId) -> Option<&Offer> {
        self.offers.iter().find(|o| o.id == offer_id)
    }

    fn offer_index(&self, offer_id: DbId) -> Result<usize, DomainError> {
        self.offers
            .iter()
            .position(|o| o.id == offer_id)
            .ok_or(DomainError::NotFound {
                entity: "Offer",
                id: offer_id,
            })
    }

    fn ensure_open(&self, operation: &str) -> Result<(), DomainError> {
        if self.status == PublicationStatus::Closed {
            return Err(DomainError::InvalidState(format!(
                "publication {} is closed, cannot {operation}",
                self.id
            )));
        }
        Ok(())
    }

    /// Attach an offer to the registry. The only way an offer becomes
    /// visible to the settlement engine.
    ///
    /// Fails with `InvalidState` if the publication is CLOSED and with
    /// `InvalidOperation` on a self-trade or an offer built against a
    /// different publication.
    pub fn add_offer(&mut self, offer: Offer) -> Result<&Offer, DomainError> {
        self.ensure_open("add an offer")?;
        if offer.publication_id != self.id {
            return Err(DomainError::InvalidOperation(format!(
                "offer {} targets publication {}, not {}",
                offer.id, offer.publication_id, self.id
            )));
        }
        offer.owned().must_differ(&self.owned, "offer", "publication")?;

        let idx = self.offers.len();
        self.offers.push(offer);
        self.updated_at = Utc::now();
        Ok(&self.offers[idx])
    }

    /// Accept one offer and settle the trade in a single logical step:
    ///
    /// 1. the accepted offer's cards move to the publication's owner;
    /// 2. the publication closes;
    /// 3. every other PENDING offer is rejected (DRAFTs are untouched);
    /// 4. the publication's own card moves to the offer's owner.
    ///
    /// Returns the full [`Settlement`] so the caller knows exactly which
    /// aggregates to persist. No intermediate state is observable: every
    /// step is a synchronous in-memory mutation.
    pub fn accept_offer(&mut self, offer_id: DbId) -> Result<Settlement, DomainError> {
        self.ensure_open("accept an offer")?;
        let idx = self.offer_index(offer_id)?;

        let publication_owner = self.owned.owner_id();
        let offer_owner = self.offers[idx].owner_id();

        let moved = self.offers[idx].accept(publication_owner)?;
        let mut transferred: Vec<CardTransfer> = moved
            .into_iter()
            .map(|card_id| CardTransfer {
                card_id,
                new_owner_id: publication_owner,
            })
            .collect();

        let rejected_offer_ids = self.close_registry(Some(offer_id))?;

        self.card.set_owner(offer_owner);
        transferred.push(CardTransfer {
            card_id: self.card.id,
            new_owner_id: offer_owner,
        });

        Ok(Settlement {
            accepted_offer_id: offer_id,
            rejected_offer_ids,
            transferred_cards: transferred,
        })
    }

    /// Promote a DRAFT offer to PENDING so it becomes a live competitor.
    /// Only possible while the publication is OPEN.
    pub fn submit_offer(&mut self, offer_id: DbId) -> Result<(), DomainError> {
        self.ensure_open("submit an offer")?;
        let idx = self.offer_index(offer_id)?;
        self.offers[idx].submit()?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Reject a single offer. The publication stays OPEN and other offers
    /// keep competing.
    pub fn reject_offer(&mut self, offer_id: DbId) -> Result<(), DomainError> {
        self.ensure_open("reject an offer")?;
        let idx = self.offer_index(offer_id)?;
        self.offers[idx].reject()?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Cancel the publication: close it and reject every PENDING offer.
    ///
    /// A publication with zero offers simply flips to CLOSED with an empty
    /// rejection set. Cancelling an already-CLOSED publication is
    /// `InvalidState`.
    pub fn cancel(&mut self) -> Result<Vec<DbId>, DomainError> {
        self.ensure_open("cancel")?;
        self.close_registry(None)
    }

    /// Close the publication, rejecting every PENDING offer except
    /// `accepted`. Re-stamps `updated_at` even when already CLOSED; callers
    /// must not invoke it twice expecting the same rejection set.
    fn close_registry(&mut self, accepted: Option<DbId>) -> Result<Vec<DbId>, DomainError> {
        self.status = PublicationStatus::Closed;
        self.updated_at = Utc::now();

        let mut rejected = Vec::new();
        for offer in &mut self.offers {
            if Some(offer.id) == accepted {
                continue;
            }
            if offer.status() == OfferStatus::Pending {
                offer.reject()?;
                rejected.push(offer.id);
            }
        }
        Ok(rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn card(id: DbId, owner: DbId) -> Card {
        Card::new(id, "Red-Eyes Black Dragon".into(), 85, None, owner)
    }

    /// Publication id 100: owner 1 lists card 1 for 100_00 cents.
    fn open_publication() -> Publication {
        Publication::new(100, 1, card(1, 1), vec![], Some(100_00)).unwrap()
    }

    fn money_offer(publication: &mut Publication, id: DbId, owner: DbId, amount: i64) {
        let offer = Offer::new(id, publication.id, owner, Some(amount), vec![], false).unwrap();
        publication.add_offer(offer).unwrap();
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn listing_with_nothing_requested_is_invalid() {
        assert_matches!(
            Publication::new(100, 1, card(1, 1), vec![], None),
            Err(DomainError::InvalidOperation(_))
        );
    }

    #[test]
    fn listing_a_foreign_card_is_invalid() {
        assert_matches!(
            Publication::new(100, 1, card(1, 2), vec![], Some(100)),
            Err(DomainError::InvalidOperation(_))
        );
    }

    #[test]
    fn non_positive_ask_price_is_invalid() {
        assert_matches!(
            Publication::new(100, 1, card(1, 1), vec![], Some(0)),
            Err(DomainError::InvalidOperation(_))
        );
    }

    #[test]
    fn wanted_archetypes_alone_suffice() {
        let publication =
            Publication::new(100, 1, card(1, 1), vec!["Dark Magician".into()], None).unwrap();
        assert_eq!(publication.status(), PublicationStatus::Open);
    }

    // -----------------------------------------------------------------------
    // add_offer
    // -----------------------------------------------------------------------

    #[test]
    fn self_trade_is_rejected() {
        let mut publication = open_publication();
        let offer = Offer::new(10, publication.id, 1, Some(100), vec![], false).unwrap();
        assert_matches!(
            publication.add_offer(offer),
            Err(DomainError::InvalidOperation(_))
        );
    }

    #[test]
    fn offer_against_another_publication_is_rejected() {
        let mut publication = open_publication();
        let offer = Offer::new(10, 999, 2, Some(100), vec![], false).unwrap();
        assert_matches!(
            publication.add_offer(offer),
            Err(DomainError::InvalidOperation(_))
        );
    }

    #[test]
    fn add_offer_on_closed_publication_is_invalid_state() {
        let mut publication = open_publication();
        publication.cancel().unwrap();
        let offer = Offer::new(10, publication.id, 2, Some(100), vec![], false).unwrap();
        assert_matches!(
            publication.add_offer(offer),
            Err(DomainError::InvalidState(_))
        );
    }

    // -----------------------------------------------------------------------
    // Scenario A: single money offer accepted
    // -----------------------------------------------------------------------

    #[test]
    fn accepting_a_money_offer_swaps_the_listed_card() {
        let mut publication = open_publication();
        money_offer(&mut publication, 10, 2, 100_00);

        let settlement = publication.accept_offer(10).unwrap();

        assert_eq!(publication.status(), PublicationStatus::Closed);
        assert_eq!(publication.offer(10).unwrap().status(), OfferStatus::Accepted);
        assert_eq!(publication.card().owner_id(), 2);
        assert!(settlement.rejected_offer_ids.is_empty());
        assert_eq!(
            settlement.transferred_cards,
            vec![CardTransfer { card_id: 1, new_owner_id: 2 }]
        );
    }

    // -----------------------------------------------------------------------
    // Scenario B: competing offers, loser's cards stay put
    // -----------------------------------------------------------------------

    #[test]
    fn accepting_one_offer_rejects_every_competitor() {
        let mut publication = open_publication();
        money_offer(&mut publication, 10, 2, 100_00);
        let card_offer =
            Offer::new(11, publication.id, 3, None, vec![card(9, 3)], false).unwrap();
        publication.add_offer(card_offer).unwrap();

        let settlement = publication.accept_offer(10).unwrap();

        assert_eq!(publication.offer(10).unwrap().status(), OfferStatus::Accepted);
        assert_eq!(publication.offer(11).unwrap().status(), OfferStatus::Rejected);
        assert_eq!(settlement.rejected_offer_ids, vec![11]);
        // The loser's card never moves: it only transfers on its own acceptance.
        assert_eq!(publication.offer(11).unwrap().cards()[0].owner_id(), 3);
        assert_eq!(publication.card().owner_id(), 2);
    }

    #[test]
    fn accepting_a_card_offer_swaps_both_ways() {
        let mut publication = open_publication();
        let card_offer =
            Offer::new(11, publication.id, 3, None, vec![card(9, 3), card(8, 3)], false).unwrap();
        publication.add_offer(card_offer).unwrap();

        let settlement = publication.accept_offer(11).unwrap();

        // The offer's cards go to the publication owner, the listed card to
        // the offer owner. Ownership is conserved, only owners change.
        assert_eq!(
            settlement.transferred_cards,
            vec![
                CardTransfer { card_id: 9, new_owner_id: 1 },
                CardTransfer { card_id: 8, new_owner_id: 1 },
                CardTransfer { card_id: 1, new_owner_id: 3 },
            ]
        );
        assert_eq!(publication.card().owner_id(), 3);
    }

    #[test]
    fn draft_offers_are_untouched_by_settlement() {
        let mut publication = open_publication();
        money_offer(&mut publication, 10, 2, 100_00);
        let draft = Offer::new(12, publication.id, 4, Some(50_00), vec![], true).unwrap();
        publication.add_offer(draft).unwrap();

        let settlement = publication.accept_offer(10).unwrap();

        assert!(settlement.rejected_offer_ids.is_empty());
        assert_eq!(publication.offer(12).unwrap().status(), OfferStatus::Draft);
    }

    #[test]
    fn single_winner_among_many() {
        let mut publication = open_publication();
        for (id, owner) in [(10, 2), (11, 3), (12, 4), (13, 5)] {
            money_offer(&mut publication, id, owner, 100_00);
        }

        let settlement = publication.accept_offer(12).unwrap();

        let accepted: Vec<DbId> = publication
            .offers()
            .iter()
            .filter(|o| o.status() == OfferStatus::Accepted)
            .map(|o| o.id)
            .collect();
        assert_eq!(accepted, vec![12]);
        assert_eq!(settlement.rejected_offer_ids, vec![10, 11, 13]);
        assert!(publication
            .offers()
            .iter()
            .filter(|o| o.id != 12)
            .all(|o| o.status() == OfferStatus::Rejected));
    }

    // -----------------------------------------------------------------------
    // Scenario C: cancellation
    // -----------------------------------------------------------------------

    #[test]
    fn cancelling_with_zero_offers_is_not_an_error() {
        let mut publication = open_publication();
        let rejected = publication.cancel().unwrap();
        assert!(rejected.is_empty());
        assert_eq!(publication.status(), PublicationStatus::Closed);
    }

    #[test]
    fn cancelling_rejects_every_pending_offer() {
        let mut publication = open_publication();
        money_offer(&mut publication, 10, 2, 100_00);
        money_offer(&mut publication, 11, 3, 90_00);

        let rejected = publication.cancel().unwrap();

        assert_eq!(rejected, vec![10, 11]);
        assert!(publication
            .offers()
            .iter()
            .all(|o| o.status() == OfferStatus::Rejected));
    }

    // -----------------------------------------------------------------------
    // Scenario D: closed publications accept no further mutation
    // -----------------------------------------------------------------------

    #[test]
    fn accept_on_closed_publication_mutates_nothing() {
        let mut publication = open_publication();
        money_offer(&mut publication, 10, 2, 100_00);
        publication.accept_offer(10).unwrap();

        let owner_before = publication.card().owner_id();
        assert_matches!(
            publication.accept_offer(10),
            Err(DomainError::InvalidState(_))
        );
        assert_eq!(publication.card().owner_id(), owner_before);
    }

    #[test]
    fn reject_on_closed_publication_is_invalid_state() {
        let mut publication = open_publication();
        money_offer(&mut publication, 10, 2, 100_00);
        money_offer(&mut publication, 11, 3, 90_00);
        publication.accept_offer(10).unwrap();

        assert_matches!(
            publication.reject_offer(11),
            Err(DomainError::InvalidState(_))
        );
    }

    #[test]
    fn cancel_twice_is_invalid_state() {
        let mut publication = open_publication();
        publication.cancel().unwrap();
        assert_matches!(publication.cancel(), Err(DomainError::InvalidState(_)));
    }

    // -----------------------------------------------------------------------
    // Other edges
    // -----------------------------------------------------------------------

    #[test]
    fn rejecting_one_offer_keeps_the_publication_open() {
        let mut publication = open_publication();
        money_offer(&mut publication, 10, 2, 100_00);
        money_offer(&mut publication, 11, 3, 90_00);

        publication.reject_offer(10).unwrap();

        assert_eq!(publication.status(), PublicationStatus::Open);
        assert_eq!(publication.offer(10).unwrap().status(), OfferStatus::Rejected);
        assert_eq!(publication.offer(11).unwrap().status(), OfferStatus::Pending);
        // The survivor can still win.
        assert!(publication.accept_offer(11).is_ok());
    }

    #[test]
    fn submitted_draft_becomes_a_live_competitor() {
        let mut publication = open_publication();
        let draft = Offer::new(12, publication.id, 4, Some(50_00), vec![], true).unwrap();
        publication.add_offer(draft).unwrap();

        publication.submit_offer(12).unwrap();
        assert_eq!(publication.offer(12).unwrap().status(), OfferStatus::Pending);

        // A submitted draft is rejected like any other pending competitor.
        money_offer(&mut publication, 10, 2, 100_00);
        let settlement = publication.accept_offer(10).unwrap();
        assert_eq!(settlement.rejected_offer_ids, vec![12]);
    }

    #[test]
    fn submit_on_closed_publication_is_invalid_state() {
        let mut publication = open_publication();
        let draft = Offer::new(12, publication.id, 4, Some(50_00), vec![], true).unwrap();
        publication.add_offer(draft).unwrap();
        publication.cancel().unwrap();
        assert_matches!(
            publication.submit_offer(12),
            Err(DomainError::InvalidState(_))
        );
    }

    #[test]
    fn accepting_an_unknown_offer_is_not_found() {
        let mut publication = open_publication();
        assert_matches!(
            publication.accept_offer(999),
            Err(DomainError::NotFound { entity: "Offer", id: 999 })
        );
    }

    #[test]
    fn accepting_an_already_rejected_offer_is_invalid_state() {
        let mut publication = open_publication();
        money_offer(&mut publication, 10, 2, 100_00);
        publication.reject_offer(10).unwrap();
        assert_matches!(
            publication.accept_offer(10),
            Err(DomainError::InvalidState(_))
        );
    }

    #[test]
    fn statuses_round_trip_through_strings() {
        assert_eq!(
            PublicationStatus::parse("open").unwrap(),
            PublicationStatus::Open
        );
        assert_eq!(
            PublicationStatus::parse("closed").unwrap(),
            PublicationStatus::Closed
        );
        assert_matches!(
            PublicationStatus::parse("done"),
            Err(DomainError::Validation(_))
        );
    }
}
