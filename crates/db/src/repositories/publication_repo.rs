//! Repository for the `publications` table.

use deckswap_core::types::{Cents, DbId};
use sqlx::PgPool;

use crate::models::publication::Publication;

const COLUMNS: &str =
    "id, owner_id, card_id, wanted_archetypes, ask_price, status, created_at, updated_at";

/// Provides CRUD operations for publications.
pub struct PublicationRepo;

impl PublicationRepo {
    /// Insert a new OPEN publication, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        card_id: DbId,
        wanted_archetypes: &[String],
        ask_price: Option<Cents>,
    ) -> Result<Publication, sqlx::Error> {
        let query = format!(
            "INSERT INTO publications (owner_id, card_id, wanted_archetypes, ask_price)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Publication>(&query)
            .bind(owner_id)
            .bind(card_id)
            .bind(wanted_archetypes)
            .bind(ask_price)
            .fetch_one(pool)
            .await
    }

    /// Find a publication by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Publication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM publications WHERE id = $1");
        sqlx::query_as::<_, Publication>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List publications, optionally filtered by status, newest first.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
    ) -> Result<Vec<Publication>, sqlx::Error> {
        match status {
            Some(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM publications WHERE status = $1 ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, Publication>(&query)
                    .bind(status)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query =
                    format!("SELECT {COLUMNS} FROM publications ORDER BY created_at DESC");
                sqlx::query_as::<_, Publication>(&query).fetch_all(pool).await
            }
        }
    }
}
