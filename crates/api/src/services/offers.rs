//! Offer lifecycle orchestration: creation, draft submission, and the
//! accept/reject settlement paths.

use std::collections::HashSet;
use std::sync::Arc;

use deckswap_core::error::DomainError;
use deckswap_core::types::DbId;
use deckswap_core::{Card, Offer, OfferStatus};
use deckswap_db::models::offer::{CreateOffer, OfferWithCards};
use deckswap_db::repositories::{CardRepo, OfferRepo, TradeRepo, UserRepo};
use deckswap_db::DbPool;
use deckswap_events::{EventBus, TradeEvent};
use serde_json::json;

use crate::error::AppResult;
use crate::services::locks::PublicationLocks;
use crate::services::publications::load_aggregate;

/// Orchestrates offer creation and status transitions around the domain
/// state machine and the repositories.
#[derive(Clone)]
pub struct OfferService {
    pool: DbPool,
    locks: Arc<PublicationLocks>,
    events: Arc<EventBus>,
}

impl OfferService {
    pub fn new(pool: DbPool, locks: Arc<PublicationLocks>, events: Arc<EventBus>) -> Self {
        Self { pool, locks, events }
    }

    /// Create an offer against a publication.
    ///
    /// Every validation (unresolved card ids, empty offer, custody,
    /// self-trade, closed publication) runs before the first persisting
    /// write, so a domain error never leaves partial state behind.
    pub async fn create(
        &self,
        actor: DbId,
        publication_id: DbId,
        input: CreateOffer,
    ) -> AppResult<OfferWithCards> {
        let _guard = self.locks.acquire(publication_id).await;

        let mut publication = load_aggregate(&self.pool, publication_id).await?;

        UserRepo::find_by_id(&self.pool, actor)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "User",
                id: actor,
            })?;

        let mut card_ids = input.card_ids.clone();
        card_ids.sort_unstable();
        card_ids.dedup();

        let card_rows = CardRepo::find_by_ids(&self.pool, &card_ids).await?;
        if card_rows.len() != card_ids.len() {
            let found: HashSet<DbId> = card_rows.iter().map(|c| c.id).collect();
            let missing: Vec<String> = card_ids
                .iter()
                .filter(|id| !found.contains(id))
                .map(ToString::to_string)
                .collect();
            return Err(DomainError::InvalidOperation(format!(
                "unresolved card ids: {}",
                missing.join(", ")
            ))
            .into());
        }
        let cards: Vec<Card> = card_rows.into_iter().map(|c| c.into_domain()).collect();

        // Id 0 placeholder: the database assigns the real id on insert.
        let offer = Offer::new(
            0,
            publication_id,
            actor,
            input.money_offer,
            cards,
            input.draft,
        )?;
        let status = offer.status();
        publication.add_offer(offer)?;

        let row = OfferRepo::create(
            &self.pool,
            publication_id,
            actor,
            input.money_offer,
            &card_ids,
            status.as_str(),
        )
        .await?;

        tracing::info!(
            user_id = actor,
            publication_id,
            offer_id = row.id,
            status = status.as_str(),
            "Offer created"
        );
        self.events.publish(
            TradeEvent::new("offer.created")
                .with_source("offer", row.id)
                .with_actor(actor),
        );

        Ok(OfferWithCards {
            offer: row,
            card_ids,
        })
    }

    /// Accept an offer, settling the trade. Publication-owner only.
    pub async fn accept(&self, actor: DbId, offer_id: DbId) -> AppResult<OfferWithCards> {
        self.update_status(actor, offer_id, OfferStatus::Accepted).await
    }

    /// Reject an offer. Publication-owner only; the publication stays open.
    pub async fn reject(&self, actor: DbId, offer_id: DbId) -> AppResult<OfferWithCards> {
        self.update_status(actor, offer_id, OfferStatus::Rejected).await
    }

    /// Dispatch an offer status update.
    ///
    /// `ACCEPTED` and `REJECTED` are the settlement paths. `PENDING` submits
    /// a draft (offer-owner only). Anything else persists the offer
    /// unchanged, a no-op update path retained for forward compatibility.
    pub async fn update_status(
        &self,
        actor: DbId,
        offer_id: DbId,
        target: OfferStatus,
    ) -> AppResult<OfferWithCards> {
        // Resolve the owning publication first; the lock domain is the
        // publication, not the offer.
        let offer_row = OfferRepo::find_by_id(&self.pool, offer_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Offer",
                id: offer_id,
            })?;
        let publication_id = offer_row.publication_id;

        let _guard = self.locks.acquire(publication_id).await;

        // Re-load under the lock; a competing request may have settled the
        // publication between the lookup and the acquire.
        let mut publication = load_aggregate(&self.pool, publication_id).await?;
        let (offer_status, offer_owned) = publication
            .offer(offer_id)
            .map(|o| (o.status(), *o.owned()))
            .ok_or(DomainError::NotFound {
                entity: "Offer",
                id: offer_id,
            })?;

        match target {
            OfferStatus::Accepted => {
                publication.owned().validate_ownership(actor, "publication")?;
                let settlement = publication.accept_offer(offer_id)?;
                TradeRepo::apply_settlement(&self.pool, publication_id, &settlement).await?;

                tracing::info!(
                    user_id = actor,
                    publication_id,
                    offer_id,
                    rejected = settlement.rejected_offer_ids.len(),
                    "Offer accepted, trade settled"
                );
                self.events.publish(
                    TradeEvent::new("offer.accepted")
                        .with_source("offer", offer_id)
                        .with_actor(actor)
                        .with_payload(json!({
                            "publication_id": publication_id,
                            "rejected_offer_ids": settlement.rejected_offer_ids,
                            "cards_transferred": settlement.transferred_cards.len(),
                        })),
                );
            }
            OfferStatus::Rejected => {
                publication.owned().validate_ownership(actor, "publication")?;
                publication.reject_offer(offer_id)?;
                TradeRepo::apply_rejection(&self.pool, publication_id, offer_id).await?;

                tracing::info!(user_id = actor, publication_id, offer_id, "Offer rejected");
                self.events.publish(
                    TradeEvent::new("offer.rejected")
                        .with_source("offer", offer_id)
                        .with_actor(actor),
                );
            }
            OfferStatus::Pending if offer_status == OfferStatus::Draft => {
                // Draft submission is the offer owner's move, not the
                // publication owner's.
                offer_owned.validate_ownership(actor, "offer")?;
                publication.submit_offer(offer_id)?;
                OfferRepo::mark_pending(&self.pool, offer_id).await?;

                tracing::info!(user_id = actor, publication_id, offer_id, "Draft offer submitted");
                self.events.publish(
                    TradeEvent::new("offer.submitted")
                        .with_source("offer", offer_id)
                        .with_actor(actor),
                );
            }
            // No-op update path retained for forward compatibility.
            OfferStatus::Pending | OfferStatus::Draft => {}
        }

        let row = OfferRepo::find_by_id(&self.pool, offer_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Offer",
                id: offer_id,
            })?;
        let card_ids = OfferRepo::card_ids(&self.pool, offer_id).await?;
        Ok(OfferWithCards {
            offer: row,
            card_ids,
        })
    }
}
