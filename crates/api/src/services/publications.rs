//! Publication lifecycle orchestration: creation and cancellation.

use std::sync::Arc;

use deckswap_core::error::DomainError;
use deckswap_core::types::DbId;
use deckswap_core::{Card, Offer, OfferStatus, Publication, PublicationStatus};
use deckswap_db::models::publication::{CreatePublication, Publication as PublicationRow};
use deckswap_db::repositories::{CardRepo, OfferRepo, PublicationRepo, TradeRepo, UserRepo};
use deckswap_db::DbPool;
use deckswap_events::{EventBus, TradeEvent};
use serde_json::json;

use crate::error::AppResult;
use crate::services::locks::PublicationLocks;

/// Load the full publication aggregate: the row, its listed card, and every
/// attached offer with its offered cards, rehydrated into the domain state
/// machine.
pub(crate) async fn load_aggregate(
    pool: &DbPool,
    publication_id: DbId,
) -> AppResult<Publication> {
    let row = PublicationRepo::find_by_id(pool, publication_id)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "Publication",
            id: publication_id,
        })?;

    let card = CardRepo::find_by_id(pool, row.card_id)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "Card",
            id: row.card_id,
        })?
        .into_domain();

    let mut offers = Vec::new();
    for offer_row in OfferRepo::list_for_publication(pool, publication_id).await? {
        let cards: Vec<Card> = CardRepo::find_for_offer(pool, offer_row.id)
            .await?
            .into_iter()
            .map(|c| c.into_domain())
            .collect();
        offers.push(Offer::from_parts(
            offer_row.id,
            offer_row.publication_id,
            offer_row.owner_id,
            offer_row.money_offer,
            cards,
            OfferStatus::parse(&offer_row.status)?,
            offer_row.closed_at,
            offer_row.created_at,
            offer_row.updated_at,
        ));
    }

    Ok(Publication::from_parts(
        row.id,
        row.owner_id,
        card,
        row.wanted_archetypes,
        row.ask_price,
        offers,
        PublicationStatus::parse(&row.status)?,
        row.created_at,
        row.updated_at,
    ))
}

/// Orchestrates publication creation and cancellation around the domain
/// state machine and the repositories.
#[derive(Clone)]
pub struct PublicationService {
    pool: DbPool,
    locks: Arc<PublicationLocks>,
    events: Arc<EventBus>,
}

impl PublicationService {
    pub fn new(pool: DbPool, locks: Arc<PublicationLocks>, events: Arc<EventBus>) -> Self {
        Self { pool, locks, events }
    }

    /// Create an OPEN publication listing one of the caller's cards.
    ///
    /// The domain constructor validates card custody, the positive ask
    /// price, and the "something must be requested" invariant before the
    /// first write.
    pub async fn create(
        &self,
        actor: DbId,
        input: CreatePublication,
    ) -> AppResult<PublicationRow> {
        let user = UserRepo::find_by_id(&self.pool, actor)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "User",
                id: actor,
            })?;

        let card = CardRepo::find_by_id(&self.pool, input.card_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Card",
                id: input.card_id,
            })?
            .into_domain();

        // Id 0 placeholder: the database assigns the real id on insert.
        Publication::new(
            0,
            user.id,
            card,
            input.wanted_archetypes.clone(),
            input.ask_price,
        )?;

        let row = PublicationRepo::create(
            &self.pool,
            actor,
            input.card_id,
            &input.wanted_archetypes,
            input.ask_price,
        )
        .await?;

        tracing::info!(
            user_id = actor,
            publication_id = row.id,
            card_id = row.card_id,
            "Publication created"
        );
        self.events.publish(
            TradeEvent::new("publication.created")
                .with_source("publication", row.id)
                .with_actor(actor),
        );
        Ok(row)
    }

    /// Cancel an OPEN publication: close it and reject every pending offer.
    ///
    /// Returns the updated row and the ids of the rejected offers.
    pub async fn cancel(
        &self,
        actor: DbId,
        publication_id: DbId,
    ) -> AppResult<(PublicationRow, Vec<DbId>)> {
        let _guard = self.locks.acquire(publication_id).await;

        let mut publication = load_aggregate(&self.pool, publication_id).await?;
        publication.owned().validate_ownership(actor, "publication")?;

        let rejected = publication.cancel()?;
        TradeRepo::apply_cancellation(&self.pool, publication_id, &rejected).await?;

        tracing::info!(
            user_id = actor,
            publication_id,
            rejected = rejected.len(),
            "Publication cancelled"
        );
        self.events.publish(
            TradeEvent::new("publication.cancelled")
                .with_source("publication", publication_id)
                .with_actor(actor)
                .with_payload(json!({ "rejected_offer_ids": rejected })),
        );

        let row = PublicationRepo::find_by_id(&self.pool, publication_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Publication",
                id: publication_id,
            })?;
        Ok((row, rejected))
    }
}
