use crate::types::DbId;

/// Domain error taxonomy for the settlement engine.
///
/// Raised at the point of violation and propagated unchanged to the
/// transport boundary, where `deckswap-api` maps each variant to an HTTP
/// status. No variant is ever silently swallowed by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// A referenced Publication/Offer/Card/User does not exist.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The caller is not the relevant owner. Never retried.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Structurally invalid request: empty offer, self-trade, offering a
    /// card the caller does not hold, unresolved card ids.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Operation against a Publication/Offer already in a terminal or
    /// incompatible state. Retryable only after re-fetching current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Request-shape violation (e.g. condition score out of range).
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
