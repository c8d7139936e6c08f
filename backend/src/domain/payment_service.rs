//! Payment collaborator.
//!
//! Records a capture for a pending booking's full total cost and then asks
//! the ledger to confirm the booking. The ledger owns the status transition
//! and the change notification; this service never mutates bookings itself.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::booking::{BookingId, BookingStatus};
use crate::domain::booking_service::BookingService;
use crate::domain::error::Error;
use crate::domain::event::AuditEvent;
use crate::domain::payment::Payment;
use crate::domain::ports::{EventLog, PaymentRepository, PaymentRepositoryError};

fn map_payment_error(error: PaymentRepositoryError) -> Error {
    match error {
        PaymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("payment store unavailable: {message}"))
        }
        PaymentRepositoryError::Query { message } => {
            Error::internal(format!("payment store error: {message}"))
        }
    }
}

/// Payment capture service.
pub struct PaymentService {
    payments: Arc<dyn PaymentRepository>,
    ledger: Arc<BookingService>,
    events: Arc<dyn EventLog>,
    clock: Arc<dyn Clock>,
}

impl PaymentService {
    /// Assemble the service from its collaborators.
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        ledger: Arc<BookingService>,
        events: Arc<dyn EventLog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            payments,
            ledger,
            events,
            clock,
        }
    }

    /// Capture payment for a pending booking and confirm it.
    ///
    /// Fails with `NotFound` for an unknown booking and `InvalidTransition`
    /// when the booking is not pending.
    pub async fn process_payment(
        &self,
        booking_id: BookingId,
        payment_method: Option<String>,
    ) -> Result<Payment, Error> {
        let booking = self.ledger.get_booking(booking_id).await?;

        if booking.status != BookingStatus::Pending {
            return Err(Error::invalid_transition(format!(
                "cannot process payment for booking in status {:?}",
                booking.status
            )));
        }

        let payment = Payment::capture(
            booking.id,
            booking.total_cost,
            payment_method,
            self.clock.utc(),
        );
        self.payments
            .save(&payment)
            .await
            .map_err(map_payment_error)?;

        // Confirmation persists the status change and publishes the signal.
        self.ledger.confirm_booking(booking_id).await?;

        info!(payment_id = %payment.id, booking_id = %booking_id, "payment processed");
        let event = AuditEvent::new(
            "PAYMENT_PROCESSED",
            "Payment",
            payment.id.as_uuid(),
            format!("payment processed for booking {booking_id}"),
            self.clock.utc(),
        );
        if let Err(error) = self.events.record(&event).await {
            warn!(%error, "audit event dropped");
        }

        Ok(payment)
    }
}

#[cfg(test)]
#[path = "payment_service_tests.rs"]
mod tests;
