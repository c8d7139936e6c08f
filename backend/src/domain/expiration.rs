//! Expiration sweeper reclaiming unpaid booking holds.
//!
//! Runs on a fixed interval independent of request traffic. Each run moves
//! stale PENDING bookings to EXPIRED and publishes a single change signal
//! for the whole run, including runs aborted mid-batch after some saves
//! committed. A run that fires while the previous one is still active is
//! skipped, and each run is capped by a deadline so a slow store cannot
//! wedge the schedule.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tracing::{error, info, warn};

use crate::domain::booking::BookingStatus;
use crate::domain::notifier::ChangeNotifier;
use crate::domain::ports::BookingRepository;

/// Default time between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Result of one sweeper run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The batch ran to completion (possibly with per-item failures).
    Completed { expired: usize, failed: usize },
    /// Another sweep was still in progress; this run did nothing.
    Skipped,
    /// The run hit its deadline or the expiry scan itself failed.
    Aborted,
}

/// Periodic task expiring stale pending bookings.
pub struct ExpirationSweeper {
    bookings: Arc<dyn BookingRepository>,
    notifier: Arc<ChangeNotifier>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    in_progress: AtomicBool,
    expired_in_run: AtomicUsize,
}

impl ExpirationSweeper {
    /// Assemble a sweeper with the given interval.
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        notifier: Arc<ChangeNotifier>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        Self {
            bookings,
            notifier,
            clock,
            interval,
            in_progress: AtomicBool::new(false),
            expired_in_run: AtomicUsize::new(0),
        }
    }

    /// Execute one sweep now, unless a sweep is already running.
    ///
    /// The batch is bounded by a deadline equal to the sweep interval.
    pub async fn run_once(&self) -> SweepOutcome {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("sweep already in progress, skipping this tick");
            return SweepOutcome::Skipped;
        }

        self.expired_in_run.store(0, Ordering::Release);
        let outcome = match tokio::time::timeout(self.interval, self.sweep_batch()).await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("sweep exceeded its deadline and was aborted");
                SweepOutcome::Aborted
            }
        };

        // Published here rather than inside the batch future: saves that
        // committed before a deadline abort dropped the batch must still
        // invalidate the availability cache.
        if self.expired_in_run.load(Ordering::Acquire) > 0 {
            self.notifier.publish();
        }

        self.in_progress.store(false, Ordering::Release);
        outcome
    }

    async fn sweep_batch(&self) -> SweepOutcome {
        let now = self.clock.utc();
        let stale = match self.bookings.find_expired_pending(now).await {
            Ok(stale) => stale,
            Err(error) => {
                error!(%error, "expiry scan failed");
                return SweepOutcome::Aborted;
            }
        };

        let mut failed = 0_usize;
        for mut booking in stale {
            booking.status = BookingStatus::Expired;
            booking.expires_at = None;
            match self.bookings.save(&booking).await {
                Ok(()) => {
                    info!(booking_id = %booking.id, "expired stale pending booking");
                    self.expired_in_run.fetch_add(1, Ordering::AcqRel);
                }
                Err(error) => {
                    // The persist did not commit, so the booking stays
                    // PENDING and is retried on the next sweep.
                    warn!(booking_id = %booking.id, %error, "failed to expire booking");
                    failed += 1;
                }
            }
        }

        SweepOutcome::Completed {
            expired: self.expired_in_run.load(Ordering::Acquire),
            failed,
        }
    }

    /// Spawn the periodic sweep loop on the current runtime.
    pub fn spawn(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tokio::spawn(async move {
            // The first tick fires immediately; skip it so startup traffic
            // settles before the first sweep.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.run_once().await;
            }
        })
    }
}

#[cfg(test)]
#[path = "expiration_tests.rs"]
mod tests;
