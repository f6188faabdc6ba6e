//! Settlement orchestration layer.
//!
//! The services here are the only callers authorized to invoke the domain
//! state machine's mutators. Each service receives its collaborators
//! (connection pool, per-publication lock registry, event bus) through its
//! constructor; there is no process-wide mutable singleton state.

pub mod locks;
pub mod offers;
pub mod publications;

pub use locks::PublicationLocks;
pub use offers::OfferService;
pub use publications::PublicationService;
