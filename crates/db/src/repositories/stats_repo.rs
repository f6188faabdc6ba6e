//! Aggregate counters for the admin statistics endpoint.

use sqlx::PgPool;

use crate::models::stats::MarketStats;

pub struct StatsRepo;

impl StatsRepo {
    /// Collect marketplace-wide counters in a single query.
    pub async fn collect(pool: &PgPool) -> Result<MarketStats, sqlx::Error> {
        let row: (i64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM users),
                (SELECT COUNT(*) FROM cards),
                (SELECT COUNT(*) FROM publications WHERE status = 'open'),
                (SELECT COUNT(*) FROM publications WHERE status = 'closed'),
                (SELECT COUNT(*) FROM offers WHERE status = 'pending'),
                (SELECT COUNT(*) FROM offers WHERE status = 'accepted'),
                (SELECT COUNT(*) FROM offers WHERE status = 'rejected')",
        )
        .fetch_one(pool)
        .await?;

        Ok(MarketStats {
            users: row.0,
            cards: row.1,
            publications_open: row.2,
            publications_closed: row.3,
            offers_pending: row.4,
            trades_completed: row.5,
            offers_rejected: row.6,
        })
    }
}
