//! Application assembly.
//!
//! Wires the in-memory store, domain services, change notifier, availability
//! cache, and expiration sweeper into the state the HTTP layer consumes. The
//! handler tests and the binary share this wiring so both exercise the same
//! object graph.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    BookingRepository, EventLog, PaymentRepository, UnitRepository, UserRepository,
};
use crate::domain::{
    AvailabilityCache, BookingService, ChangeNotifier, ExpirationSweeper, PaymentService,
    UnitService, UserService,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{bookings, payments, stats, units, users};
use crate::outbound::persistence::{
    InMemoryBookingRepository, InMemoryEventLog, InMemoryPaymentRepository, InMemoryUnitRepository,
    InMemoryUserRepository, MemoryStore,
};

/// Fully wired application graph.
pub struct AppContext {
    pub state: HttpState,
    pub store: Arc<MemoryStore>,
    pub sweeper: Arc<ExpirationSweeper>,
}

impl AppContext {
    /// Assemble the application over a fresh in-memory store using the wall
    /// clock.
    pub fn in_memory(sweep_interval: Duration) -> Self {
        Self::with_clock(Arc::new(DefaultClock), sweep_interval)
    }

    /// Assemble the application with an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>, sweep_interval: Duration) -> Self {
        let store = MemoryStore::new();
        let units_repo: Arc<dyn UnitRepository> =
            Arc::new(InMemoryUnitRepository::new(store.clone()));
        let bookings_repo: Arc<dyn BookingRepository> =
            Arc::new(InMemoryBookingRepository::new(store.clone()));
        let users_repo: Arc<dyn UserRepository> =
            Arc::new(InMemoryUserRepository::new(store.clone()));
        let payments_repo: Arc<dyn PaymentRepository> =
            Arc::new(InMemoryPaymentRepository::new(store.clone()));
        let events: Arc<dyn EventLog> = Arc::new(InMemoryEventLog::new(store.clone()));

        let notifier = Arc::new(ChangeNotifier::new());
        let availability = AvailabilityCache::subscribe(units_repo.clone(), &notifier);

        let booking_service = Arc::new(BookingService::new(
            bookings_repo.clone(),
            units_repo.clone(),
            users_repo.clone(),
            events.clone(),
            notifier.clone(),
            clock.clone(),
        ));
        let unit_service = Arc::new(UnitService::new(
            units_repo,
            users_repo.clone(),
            events.clone(),
            notifier.clone(),
            clock.clone(),
        ));
        let user_service = Arc::new(UserService::new(users_repo, events.clone(), clock.clone()));
        let payment_service = Arc::new(PaymentService::new(
            payments_repo,
            booking_service.clone(),
            events,
            clock.clone(),
        ));
        let sweeper = Arc::new(ExpirationSweeper::new(
            bookings_repo,
            notifier,
            clock,
            sweep_interval,
        ));

        Self {
            state: HttpState {
                bookings: booking_service,
                units: unit_service,
                users: user_service,
                payments: payment_service,
                availability,
            },
            store,
            sweeper,
        }
    }
}

/// Register the `/api/v1` scope on an Actix application.
pub fn configure(state: HttpState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |config| {
        config.app_data(web::Data::new(state)).service(
            web::scope("/api/v1")
                .service(users::create_user)
                .service(users::get_user)
                .service(units::create_unit)
                // `/units/search` must register before `/units/{id}`.
                .service(units::search_units)
                .service(units::get_unit)
                .service(units::update_unit)
                .service(units::delete_unit)
                .service(bookings::create_booking)
                .service(bookings::get_booking)
                .service(bookings::cancel_booking)
                .service(payments::process_payment)
                .service(stats::availability_stats)
                .service(stats::available_units)
                .service(stats::cache_health),
        );
    }
}
