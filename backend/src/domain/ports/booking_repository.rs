//! Port for booking persistence, the conflict query, and the expiry scan.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::domain::booking::{Booking, BookingId};
use crate::domain::unit::UnitId;

/// Errors surfaced by booking persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingRepositoryError {
    /// Store connection could not be established.
    #[error("booking store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("booking store query failed: {message}")]
    Query { message: String },
}

impl BookingRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Persistence port for booking aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert or replace a booking record.
    async fn save(&self, booking: &Booking) -> Result<(), BookingRepositoryError>;

    /// Fetch a booking by identifier.
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Bookings for `unit_id` in PENDING or CONFIRMED status whose date range
    /// satisfies `NOT (existing.end < start OR existing.start > end)`.
    async fn find_conflicting(
        &self,
        unit_id: &UnitId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Booking>, BookingRepositoryError>;

    /// PENDING bookings whose expiry timestamp is strictly before `before`.
    async fn find_expired_pending(
        &self,
        before: DateTime<Utc>,
    ) -> Result<Vec<Booking>, BookingRepositoryError>;
}
