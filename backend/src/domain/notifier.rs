//! In-process change notifications for availability.
//!
//! A single logical broadcast seam between the booking ledger, the sweeper,
//! and the unit service on the producing side and the availability cache on
//! the consuming side. Signals carry no payload and are not deduplicated;
//! the cache's valid/invalid flag absorbs redundant publishes. Listeners are
//! invoked synchronously so an invalidation always lands before the
//! publishing mutation returns.

use std::sync::{Arc, RwLock};

/// Consumer of "availability may have changed" signals.
pub trait AvailabilityListener: Send + Sync {
    /// React to a change signal. Must be cheap and non-blocking.
    fn availability_changed(&self);
}

/// Registry of availability listeners.
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: RwLock<Vec<Arc<dyn AvailabilityListener>>>,
}

impl ChangeNotifier {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners register once, at construction time.
    pub fn register(&self, listener: Arc<dyn AvailabilityListener>) {
        let mut listeners = match self.listeners.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.push(listener);
    }

    /// Publish one payload-free signal to every registered listener.
    pub fn publish(&self) {
        let snapshot: Vec<Arc<dyn AvailabilityListener>> = {
            let listeners = match self.listeners.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            listeners.clone()
        };
        for listener in snapshot {
            listener.availability_changed();
        }
    }
}
