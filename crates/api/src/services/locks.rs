//! Per-publication mutual exclusion.
//!
//! The publication is the lock domain: two concurrent accepts against the
//! same publication must not both observe it OPEN, or the same traded card
//! would be double-transferred. Operations on distinct publications run
//! fully parallel.

use std::collections::HashMap;
use std::sync::Arc;

use deckswap_core::types::DbId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-publication-id async mutexes.
///
/// Entries are created on first use and live for the process lifetime; a
/// closed publication's lock is cheap (an `Arc<Mutex<()>>`) and keeps late
/// requests against it serialized too.
#[derive(Default)]
pub struct PublicationLocks {
    inner: Mutex<HashMap<DbId, Arc<Mutex<()>>>>,
}

impl PublicationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one publication, waiting if another mutating
    /// operation currently holds it. The guard is owned so it can be held
    /// across the service's repository awaits.
    pub async fn acquire(&self, publication_id: DbId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            Arc::clone(
                map.entry(publication_id)
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}
