//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-row settlement writes
//! go through [`TradeRepo`], which wraps them in a single transaction.

pub mod card_repo;
pub mod offer_repo;
pub mod publication_repo;
pub mod stats_repo;
pub mod trade_repo;
pub mod user_repo;

pub use card_repo::CardRepo;
pub use offer_repo::OfferRepo;
pub use publication_repo::PublicationRepo;
pub use stats_repo::StatsRepo;
pub use trade_repo::TradeRepo;
pub use user_repo::UserRepo;
