//! Memoized count of units available for booking.
//!
//! A single-entry cache over the unit store's availability count. The entry
//! is invalidated by change signals and recomputed synchronously on the next
//! read; there is no TTL. A generation counter guards against the lost
//! invalidation: a signal that arrives while a recompute is in flight keeps
//! the entry invalid instead of being overwritten by the stale result.

use std::sync::{Arc, Mutex};

use tracing::{debug, error, info};

use crate::domain::error::Error;
use crate::domain::notifier::{AvailabilityListener, ChangeNotifier};
use crate::domain::ports::{UnitRepository, UnitRepositoryError};

fn map_unit_error(error: UnitRepositoryError) -> Error {
    match error {
        UnitRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("unit store unavailable: {message}"))
        }
        UnitRepositoryError::Query { message } => {
            Error::internal(format!("unit store error: {message}"))
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    valid: bool,
    count: u64,
    generation: u64,
}

/// Event-driven memoized availability counter.
pub struct AvailabilityCache {
    units: Arc<dyn UnitRepository>,
    state: Mutex<CacheState>,
}

impl AvailabilityCache {
    /// Build the cache and register it with the notifier. Registration
    /// happens exactly once, here.
    pub fn subscribe(units: Arc<dyn UnitRepository>, notifier: &ChangeNotifier) -> Arc<Self> {
        let cache = Arc::new(Self {
            units,
            state: Mutex::new(CacheState::default()),
        });
        notifier.register(cache.clone());
        cache
    }

    /// Build an unregistered cache. Used by tests that drive invalidation
    /// directly.
    pub fn detached(units: Arc<dyn UnitRepository>) -> Arc<Self> {
        Arc::new(Self {
            units,
            state: Mutex::new(CacheState::default()),
        })
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, CacheState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Number of units with no active booking.
    ///
    /// Returns the memoized value without touching storage while the entry is
    /// valid; otherwise recomputes from the unit store and memoizes.
    pub async fn available_count(&self) -> Result<u64, Error> {
        let generation_before = {
            let state = self.lock_state();
            if state.valid {
                return Ok(state.count);
            }
            state.generation
        };

        debug!("availability cache miss, recomputing from unit store");
        let count = self
            .units
            .count_available()
            .await
            .map_err(map_unit_error)?;

        let mut state = self.lock_state();
        if state.generation == generation_before {
            state.count = count;
            state.valid = true;
        }
        // A generation bump during the recompute means another mutation
        // landed; serve this result but leave the entry invalid.
        Ok(count)
    }

    /// Mark the entry invalid. Idempotent.
    pub fn invalidate(&self) {
        let mut state = self.lock_state();
        state.valid = false;
        state.generation = state.generation.wrapping_add(1);
    }

    /// Liveness probe: attempts a read and converts any error to `false`.
    /// Populates the cache as a side effect.
    pub async fn is_healthy(&self) -> bool {
        match self.available_count().await {
            Ok(_) => true,
            Err(error) => {
                error!(%error, "availability cache health check failed");
                false
            }
        }
    }

    /// Startup warm-up: compute once so the first request is served from the
    /// memoized entry. A failure is logged and left for the first read.
    pub async fn warm_up(&self) {
        match self.available_count().await {
            Ok(count) => info!(available_units = count, "availability cache warmed"),
            Err(error) => error!(%error, "availability cache warm-up failed"),
        }
    }
}

impl AvailabilityListener for AvailabilityCache {
    fn availability_changed(&self) {
        self.invalidate();
    }
}

#[cfg(test)]
#[path = "availability_tests.rs"]
mod tests;
