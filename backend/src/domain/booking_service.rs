//! Booking ledger: conflict detection and the booking lifecycle.
//!
//! The ledger owns every status transition. Creation runs the conflict query
//! and the insert under a per-unit lock so two concurrent requests for
//! overlapping ranges on the same unit serialise instead of both passing the
//! check. Every successful mutation publishes one availability change signal.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::booking::{Booking, BookingId, BookingStatus};
use crate::domain::error::Error;
use crate::domain::event::AuditEvent;
use crate::domain::notifier::ChangeNotifier;
use crate::domain::ports::{
    BookingRepository, BookingRepositoryError, EventLog, UnitRepository, UnitRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::unit::UnitId;
use crate::domain::user::UserId;

fn map_booking_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("booking store unavailable: {message}"))
        }
        BookingRepositoryError::Query { message } => {
            Error::internal(format!("booking store error: {message}"))
        }
    }
}

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

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

/// Per-unit async locks serialising conflict check and insert.
///
/// Lock entries are created lazily and never removed; the map grows with the
/// number of distinct units booked in this process, which is bounded by the
/// unit inventory.
#[derive(Default)]
struct UnitLockRegistry {
    locks: Mutex<HashMap<UnitId, Arc<tokio::sync::Mutex<()>>>>,
}

impl UnitLockRegistry {
    async fn acquire(&self, unit_id: UnitId) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = {
            let mut locks = match self.locks.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            Arc::clone(locks.entry(unit_id).or_default())
        };
        lock.lock_owned().await
    }
}

/// Request payload for creating a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateBookingRequest {
    pub unit_id: UnitId,
    pub user_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// The booking ledger service.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    units: Arc<dyn UnitRepository>,
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventLog>,
    notifier: Arc<ChangeNotifier>,
    clock: Arc<dyn Clock>,
    unit_locks: UnitLockRegistry,
}

impl BookingService {
    /// Assemble the ledger from its collaborators.
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        units: Arc<dyn UnitRepository>,
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventLog>,
        notifier: Arc<ChangeNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bookings,
            units,
            users,
            events,
            notifier,
            clock,
            unit_locks: UnitLockRegistry::default(),
        }
    }

    /// Reserve a unit for a date range as a pending hold.
    ///
    /// Fails with `NotFound` when the unit or user does not exist and with
    /// `Conflict` when an active booking overlaps the requested range under
    /// the closed-interval predicate.
    pub async fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking, Error> {
        let unit = self
            .units
            .find_by_id(&request.unit_id)
            .await
            .map_err(map_unit_error)?
            .ok_or_else(|| Error::not_found(format!("unit {} not found", request.unit_id)))?;

        self.users
            .find_by_id(&request.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {} not found", request.user_id)))?;

        // Conflict query and insert must observe a consistent snapshot of the
        // unit's booking set; the guard is held until the save commits.
        let _unit_guard = self.unit_locks.acquire(request.unit_id).await;

        let conflicts = self
            .bookings
            .find_conflicting(&request.unit_id, request.start_date, request.end_date)
            .await
            .map_err(map_booking_error)?;

        if !conflicts.is_empty() {
            return Err(Error::conflict(
                "unit is not available for the selected dates",
            ));
        }

        let booking = Booking::pending_hold(
            request.unit_id,
            request.user_id,
            request.start_date,
            request.end_date,
            unit.final_cost,
            self.clock.utc(),
        );

        self.bookings
            .save(&booking)
            .await
            .map_err(map_booking_error)?;

        info!(booking_id = %booking.id, unit_id = %booking.unit_id, "booking created");
        self.record_event(
            "BOOKING_CREATED",
            booking.id,
            format!("booking created for unit {}", booking.unit_id),
        )
        .await;
        self.notifier.publish();

        Ok(booking)
    }

    /// Cancel a pending or confirmed booking.
    pub async fn cancel_booking(&self, id: BookingId) -> Result<Booking, Error> {
        let mut booking = self.require_booking(id).await?;

        if !booking.status.can_cancel() {
            return Err(Error::invalid_transition(format!(
                "cannot cancel booking in status {:?}",
                booking.status
            )));
        }

        booking.status = BookingStatus::Cancelled;
        booking.expires_at = None;
        self.bookings
            .save(&booking)
            .await
            .map_err(map_booking_error)?;

        info!(booking_id = %booking.id, "booking cancelled");
        self.record_event("BOOKING_CANCELLED", booking.id, "booking cancelled")
            .await;
        self.notifier.publish();

        Ok(booking)
    }

    /// Confirm a pending booking. Invoked by the payment collaborator after
    /// it records a capture; any other status is an invalid transition.
    pub async fn confirm_booking(&self, id: BookingId) -> Result<Booking, Error> {
        let mut booking = self.require_booking(id).await?;

        if booking.status != BookingStatus::Pending {
            return Err(Error::invalid_transition(format!(
                "cannot confirm booking in status {:?}",
                booking.status
            )));
        }

        booking.status = BookingStatus::Confirmed;
        booking.expires_at = None;
        self.bookings
            .save(&booking)
            .await
            .map_err(map_booking_error)?;

        info!(booking_id = %booking.id, "booking confirmed");
        self.record_event("BOOKING_CONFIRMED", booking.id, "booking confirmed")
            .await;
        self.notifier.publish();

        Ok(booking)
    }

    /// Fetch a booking. Pure read, no side effects.
    pub async fn get_booking(&self, id: BookingId) -> Result<Booking, Error> {
        self.require_booking(id).await
    }

    async fn require_booking(&self, id: BookingId) -> Result<Booking, Error> {
        self.bookings
            .find_by_id(&id)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| Error::not_found(format!("booking {id} not found")))
    }

    async fn record_event(&self, event_type: &str, id: BookingId, data: impl Into<String>) {
        let event = AuditEvent::new(event_type, "Booking", id.as_uuid(), data, self.clock.utc());
        if let Err(error) = self.events.record(&event).await {
            warn!(%error, event_type, "audit event dropped");
        }
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
