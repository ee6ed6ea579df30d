use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::error::AppError;

/// InFlight
///
/// Tracks which operation keys (e.g. `login:alice@uni.edu`, `item-status:7`) currently
/// have a request pending. A second request for a busy key is rejected immediately
/// instead of racing the first one.
#[derive(Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key` until the returned ticket is dropped.
    pub fn begin(&self, key: impl Into<String>) -> Result<InFlightTicket, AppError> {
        let key = key.into();
        if !self.lock().insert(key.clone()) {
            tracing::debug!(key = %key, "rejecting duplicate in-flight request");
            return Err(AppError::InFlight(key));
        }
        Ok(InFlightTicket {
            keys: self.keys.clone(),
            key,
        })
    }

    pub fn is_busy(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    // A panic while holding the lock leaves the set itself intact.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Releases its key on drop, including when the owning request future is cancelled.
pub struct InFlightTicket {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.key);
    }
}
