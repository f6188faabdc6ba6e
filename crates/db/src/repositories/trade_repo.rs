//! Transactional settlement writes.
//!
//! A settlement touches N+2 rows (publication, winning offer, every losing
//! offer, every transferred card). All of them commit or none do; partial
//! persistence after a domain transition is forbidden.

use deckswap_core::publication::Settlement;
use deckswap_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

/// Applies multi-row trade outcomes atomically.
pub struct TradeRepo;

impl TradeRepo {
    /// Persist the outcome of `Publication::accept_offer`: close the
    /// publication, mark the winner accepted, the losers rejected, and move
    /// every transferred card to its new owner.
    pub async fn apply_settlement(
        pool: &PgPool,
        publication_id: DbId,
        settlement: &Settlement,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        Self::close_publication(&mut tx, publication_id).await?;

        sqlx::query(
            "UPDATE offers SET status = 'accepted', closed_at = NOW(), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(settlement.accepted_offer_id)
        .execute(&mut *tx)
        .await?;

        Self::reject_offers(&mut tx, &settlement.rejected_offer_ids).await?;

        for transfer in &settlement.transferred_cards {
            sqlx::query("UPDATE cards SET owner_id = $2, updated_at = NOW() WHERE id = $1")
                .bind(transfer.card_id)
                .bind(transfer.new_owner_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            publication_id,
            accepted_offer_id = settlement.accepted_offer_id,
            rejected = settlement.rejected_offer_ids.len(),
            cards_transferred = settlement.transferred_cards.len(),
            "Settlement persisted"
        );
        Ok(())
    }

    /// Persist a cancellation: close the publication and reject every
    /// offer the domain close pass rejected.
    pub async fn apply_cancellation(
        pool: &PgPool,
        publication_id: DbId,
        rejected_offer_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::close_publication(&mut tx, publication_id).await?;
        Self::reject_offers(&mut tx, rejected_offer_ids).await?;
        tx.commit().await?;

        tracing::info!(
            publication_id,
            rejected = rejected_offer_ids.len(),
            "Cancellation persisted"
        );
        Ok(())
    }

    /// Persist a single-offer rejection; the publication stays open but is
    /// re-stamped.
    pub async fn apply_rejection(
        pool: &PgPool,
        publication_id: DbId,
        offer_id: DbId,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::reject_offers(&mut tx, &[offer_id]).await?;
        sqlx::query("UPDATE publications SET updated_at = NOW() WHERE id = $1")
            .bind(publication_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn close_publication(
        tx: &mut Transaction<'_, Postgres>,
        publication_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE publications SET status = 'closed', updated_at = NOW() WHERE id = $1")
            .bind(publication_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn reject_offers(
        tx: &mut Transaction<'_, Postgres>,
        offer_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        if offer_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "UPDATE offers SET status = 'rejected', closed_at = NOW(), updated_at = NOW()
             WHERE id = ANY($1)",
        )
        .bind(offer_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
