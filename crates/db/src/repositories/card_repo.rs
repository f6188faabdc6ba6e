//! Repository for the `cards` table.

use deckswap_core::types::DbId;
use sqlx::PgPool;

use crate::models::card::{Card, CreateCard};

const COLUMNS: &str = "id, archetype, condition_score, image_url, owner_id, created_at, updated_at";

/// Provides CRUD operations for cards.
pub struct CardRepo;

impl CardRepo {
    /// Insert a new card owned by `owner_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateCard,
    ) -> Result<Card, sqlx::Error> {
        let query = format!(
            "INSERT INTO cards (archetype, condition_score, image_url, owner_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(&input.archetype)
            .bind(input.condition_score)
            .bind(&input.image_url)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a card by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Card>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cards WHERE id = $1");
        sqlx::query_as::<_, Card>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a set of card ids. The result may be shorter than the input
    /// when some ids do not exist; callers diff the two to report every
    /// unresolved id.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Card>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cards WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Card>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Cards attached to an offer via the `offer_cards` link table.
    pub async fn find_for_offer(pool: &PgPool, offer_id: DbId) -> Result<Vec<Card>, sqlx::Error> {
        let query = format!(
            "SELECT c.{} FROM cards c
             JOIN offer_cards oc ON oc.card_id = c.id
             WHERE oc.offer_id = $1
             ORDER BY c.id",
            COLUMNS.replace(", ", ", c.")
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(offer_id)
            .fetch_all(pool)
            .await
    }

    /// List all cards owned by a user, newest first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Card>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cards WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }
}
