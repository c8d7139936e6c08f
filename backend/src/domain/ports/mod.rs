//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the unit store, booking persistence, audit log). Each trait exposes a
//! strongly typed error so adapters map their failures into predictable
//! variants instead of returning a catch-all.

pub mod booking_repository;
pub mod event_log;
pub mod payment_repository;
pub mod unit_repository;
pub mod user_repository;

pub use booking_repository::{BookingRepository, BookingRepositoryError};
pub use event_log::{EventLog, EventLogError};
pub use payment_repository::{PaymentRepository, PaymentRepositoryError};
pub use unit_repository::{
    SortDirection, UnitPage, UnitRepository, UnitRepositoryError, UnitSearchFilter, UnitSortKey,
};
pub use user_repository::{UserRepository, UserRepositoryError};

#[cfg(test)]
pub use booking_repository::MockBookingRepository;
#[cfg(test)]
pub use event_log::MockEventLog;
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
#[cfg(test)]
pub use unit_repository::MockUnitRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
