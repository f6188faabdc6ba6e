//! Deckswap domain core.
//!
//! Pure in-memory trade-settlement engine: the ownership primitive, the
//! Card/Offer/Publication entities, and the one-winner settlement state
//! machine. No I/O lives here; loading and persisting entities is the
//! orchestration layer's job (`deckswap-api` services over `deckswap-db`
//! repositories).

pub mod card;
pub mod error;
pub mod offer;
pub mod ownership;
pub mod publication;
pub mod types;

pub use card::Card;
pub use error::DomainError;
pub use offer::{Offer, OfferStatus};
pub use ownership::Owned;
pub use publication::{Publication, PublicationStatus, Settlement};
