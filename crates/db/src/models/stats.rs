//! Marketplace counters returned by the admin statistics endpoint.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MarketStats {
    pub users: i64,
    pub cards: i64,
    pub publications_open: i64,
    pub publications_closed: i64,
    pub offers_pending: i64,
    /// Accepted offers, i.e. completed trades.
    pub trades_completed: i64,
    pub offers_rejected: i64,
}
