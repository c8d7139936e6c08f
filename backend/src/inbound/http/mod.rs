//! HTTP inbound adapter exposing REST endpoints.

pub mod bookings;
pub mod error;
pub mod health;
pub mod payments;
pub mod state;
pub mod stats;
#[cfg(test)]
pub mod test_utils;
pub mod units;
pub mod users;

pub use error::ApiResult;
