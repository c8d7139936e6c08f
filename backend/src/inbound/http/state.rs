//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the domain services and remain testable against in-memory storage.

use std::sync::Arc;

use crate::domain::{
    AvailabilityCache, BookingService, PaymentService, UnitService, UserService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub bookings: Arc<BookingService>,
    pub units: Arc<UnitService>,
    pub users: Arc<UserService>,
    pub payments: Arc<PaymentService>,
    pub availability: Arc<AvailabilityCache>,
}
