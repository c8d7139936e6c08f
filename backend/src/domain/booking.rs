//! Booking aggregate and its lifecycle state machine.
//!
//! A booking starts as an unpaid PENDING hold that expires after
//! [`HOLD_DURATION`] unless payment confirms it. Date ranges use the
//! closed-interval overlap predicate inherited from the conflict query:
//! a booking ending on day N conflicts with one starting on day N. Changing
//! that predicate would change booking capacity, so it is preserved as is.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::Money;
use super::unit::UnitId;
use super::user::UserId;

/// How long an unpaid hold stays reserved before the sweeper reclaims it.
pub const HOLD_DURATION: Duration = Duration::minutes(15);

/// Unique booking identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// The underlying UUID.
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting payment; holds the unit until the expiry timestamp.
    Pending,
    /// Payment captured.
    Confirmed,
    /// Cancelled explicitly while pending or confirmed.
    Cancelled,
    /// Reclaimed by the expiration sweeper.
    Expired,
}

impl BookingStatus {
    /// Whether the booking counts against unit availability.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether an explicit cancellation is permitted from this status.
    pub fn can_cancel(self) -> bool {
        self.is_active()
    }
}

/// Whether two stay ranges overlap under the closed-interval predicate
/// `NOT (existing.end < new.start OR existing.start > new.end)`.
pub fn ranges_overlap(
    existing_start: NaiveDate,
    existing_end: NaiveDate,
    new_start: NaiveDate,
    new_end: NaiveDate,
) -> bool {
    !(existing_end < new_start || existing_start > new_end)
}

/// Total cost of a stay: the unit's active cost per day, clamped to a
/// one-day minimum so zero-length stays are still charged.
pub fn stay_cost(final_cost: Money, start: NaiveDate, end: NaiveDate) -> Money {
    let days = (end - start).num_days().max(1);
    final_cost.times(days)
}

/// A reservation of one unit for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub unit_id: UnitId,
    pub user_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost: Money,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    /// Set only while the booking is a pending hold.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Create a pending hold for a unit.
    pub fn pending_hold(
        unit_id: UnitId,
        user_id: UserId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        unit_final_cost: Money,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BookingId::random(),
            unit_id,
            user_id,
            start_date,
            end_date,
            total_cost: stay_cost(unit_final_cost, start_date, end_date),
            status: BookingStatus::Pending,
            created_at: now,
            expires_at: Some(now + HOLD_DURATION),
        }
    }

    /// Whether this booking overlaps the given range.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        ranges_overlap(self.start_date, self.end_date, start, end)
    }
}
