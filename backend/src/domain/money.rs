//! Monetary amounts in integer minor units.
//!
//! Costs are carried as whole cents so arithmetic stays exact; rendering to
//! major units is an adapter concern.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// An amount of money in cents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = i64, example = 10_000)]
pub struct Money(i64);

/// Validation errors returned when constructing a strictly positive [`Money`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoneyValidationError {
    /// The amount was zero or negative where a positive cost is required.
    #[error("amount must be strictly positive, got {cents} cents")]
    NotPositive { cents: i64 },
}

impl Money {
    /// Wrap a raw amount of cents without a positivity check.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Construct a strictly positive amount, as unit costs require.
    pub fn positive(cents: i64) -> Result<Self, MoneyValidationError> {
        if cents <= 0 {
            return Err(MoneyValidationError::NotPositive { cents });
        }
        Ok(Self(cents))
    }

    /// The raw amount in cents.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Multiply by a day count, saturating at the representable bounds.
    pub fn times(self, days: i64) -> Self {
        Self(self.0.saturating_mul(days))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let major = self.0 / 100;
        let minor = (self.0 % 100).abs();
        write!(f, "{major}.{minor:02}")
    }
}
