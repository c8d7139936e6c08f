//! Domain primitives, aggregates, and services.
//!
//! The booking core: conflict detection and the booking lifecycle
//! (`booking_service`), the expiration sweep (`expiration`), the memoized
//! availability counter (`availability`), and the change-notification seam
//! between them (`notifier`). Storage is reached only through the traits in
//! [`ports`].

pub mod availability;
pub mod booking;
pub mod booking_service;
pub mod error;
pub mod event;
pub mod expiration;
pub mod money;
pub mod notifier;
pub mod payment;
pub mod payment_service;
pub mod ports;
pub mod unit;
pub mod unit_service;
pub mod user;
pub mod user_service;

pub use self::availability::AvailabilityCache;
pub use self::booking::{Booking, BookingId, BookingStatus, HOLD_DURATION};
pub use self::booking_service::{BookingService, CreateBookingRequest};
pub use self::error::{Error, ErrorCode};
pub use self::event::AuditEvent;
pub use self::expiration::{ExpirationSweeper, SweepOutcome, DEFAULT_SWEEP_INTERVAL};
pub use self::money::Money;
pub use self::notifier::{AvailabilityListener, ChangeNotifier};
pub use self::payment::{Payment, PaymentId};
pub use self::payment_service::PaymentService;
pub use self::unit::{AccommodationType, Unit, UnitDraft, UnitId};
pub use self::unit_service::UnitService;
pub use self::user::{User, UserId};
pub use self::user_service::UserService;
