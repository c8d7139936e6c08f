//! Payment record referencing a booking.
//!
//! The payment collaborator records a capture and then asks the ledger to
//! confirm the booking. Payments reference bookings; they never own them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::booking::BookingId;
use super::money::Money;

/// Unique payment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PaymentId(Uuid);

impl PaymentId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A captured payment for a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub booking_id: BookingId,
    pub amount: Money,
    pub payment_method: Option<String>,
    pub transaction_id: String,
    pub processed_at: DateTime<Utc>,
}

impl Payment {
    /// Record a capture for a booking's full total cost.
    pub fn capture(
        booking_id: BookingId,
        amount: Money,
        payment_method: Option<String>,
        processed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PaymentId::random(),
            booking_id,
            amount,
            payment_method,
            transaction_id: Uuid::new_v4().to_string(),
            processed_at,
        }
    }
}
