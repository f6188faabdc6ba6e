//! Repository for the `offers` table and its `offer_cards` links.

use deckswap_core::types::{Cents, DbId};
use sqlx::PgPool;

use crate::models::offer::Offer;

const COLUMNS: &str =
    "id, publication_id, owner_id, money_offer, status, closed_at, created_at, updated_at";

/// Provides CRUD operations for offers.
pub struct OfferRepo;

impl OfferRepo {
    /// Insert a new offer and its card links in one transaction, returning
    /// the created row. Also stamps the publication's `updated_at`.
    pub async fn create(
        pool: &PgPool,
        publication_id: DbId,
        owner_id: DbId,
        money_offer: Option<Cents>,
        card_ids: &[DbId],
        status: &str,
    ) -> Result<Offer, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO offers (publication_id, owner_id, money_offer, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let offer = sqlx::query_as::<_, Offer>(&query)
            .bind(publication_id)
            .bind(owner_id)
            .bind(money_offer)
            .bind(status)
            .fetch_one(&mut *tx)
            .await?;

        for card_id in card_ids {
            sqlx::query("INSERT INTO offer_cards (offer_id, card_id) VALUES ($1, $2)")
                .bind(offer.id)
                .bind(card_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("UPDATE publications SET updated_at = NOW() WHERE id = $1")
            .bind(publication_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(offer)
    }

    /// Find an offer by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Offer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM offers WHERE id = $1");
        sqlx::query_as::<_, Offer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every offer attached to a publication, oldest first (registry order).
    pub async fn list_for_publication(
        pool: &PgPool,
        publication_id: DbId,
    ) -> Result<Vec<Offer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM offers WHERE publication_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(publication_id)
            .fetch_all(pool)
            .await
    }

    /// Card ids linked to an offer.
    pub async fn card_ids(pool: &PgPool, offer_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT card_id FROM offer_cards WHERE offer_id = $1 ORDER BY card_id")
                .bind(offer_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Promote a draft offer to pending. Returns the updated row if the
    /// offer existed.
    pub async fn mark_pending(pool: &PgPool, id: DbId) -> Result<Option<Offer>, sqlx::Error> {
        let query = format!(
            "UPDATE offers SET status = 'pending', updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
