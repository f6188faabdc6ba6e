use std::sync::Arc;

use deckswap_events::EventBus;

use crate::config::ServerConfig;
use crate::services::{OfferService, PublicationLocks, PublicationService};

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: deckswap_db::DbPool,
    /// Server configuration (JWT secret, timeouts, CORS origins).
    pub config: Arc<ServerConfig>,
    /// Event bus for fire-and-forget notification/statistics hooks.
    pub events: Arc<EventBus>,
    /// Publication lifecycle orchestration.
    pub publications: PublicationService,
    /// Offer lifecycle and settlement orchestration.
    pub offers: OfferService,
}

impl AppState {
    /// Wire up the service graph: one lock registry and one event bus,
    /// injected into both services.
    pub fn new(pool: deckswap_db::DbPool, config: ServerConfig) -> Self {
        let locks = Arc::new(PublicationLocks::new());
        let events = Arc::new(EventBus::default());

        let publications =
            PublicationService::new(pool.clone(), Arc::clone(&locks), Arc::clone(&events));
        let offers = OfferService::new(pool.clone(), Arc::clone(&locks), Arc::clone(&events));

        Self {
            pool,
            config: Arc::new(config),
            events,
            publications,
            offers,
        }
    }
}
