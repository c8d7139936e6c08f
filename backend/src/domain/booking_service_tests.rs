//! Tests for the booking ledger.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use mockable::MockClock;

use super::*;
use crate::domain::booking::HOLD_DURATION;
use crate::domain::money::Money;
use crate::domain::notifier::AvailabilityListener;
use crate::domain::ports::{
    MockBookingRepository, MockEventLog, MockUnitRepository, MockUserRepository,
};
use crate::domain::unit::{AccommodationType, Unit, UnitDraft};
use crate::domain::user::User;
use crate::domain::ErrorCode;

#[derive(Default)]
struct SignalCounter {
    publishes: AtomicUsize,
}

impl SignalCounter {
    fn count(&self) -> usize {
        self.publishes.load(Ordering::SeqCst)
    }
}

impl AvailabilityListener for SignalCounter {
    fn availability_changed(&self) {
        self.publishes.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    bookings: MockBookingRepository,
    units: MockUnitRepository,
    users: MockUserRepository,
    events: MockEventLog,
    counter: Arc<SignalCounter>,
}

impl Harness {
    fn new() -> Self {
        let mut events = MockEventLog::new();
        events.expect_record().returning(|_| Ok(()));
        Self {
            bookings: MockBookingRepository::new(),
            units: MockUnitRepository::new(),
            users: MockUserRepository::new(),
            events,
            counter: Arc::new(SignalCounter::default()),
        }
    }

    fn build(self) -> (BookingService, Arc<SignalCounter>) {
        let notifier = Arc::new(ChangeNotifier::new());
        notifier.register(self.counter.clone());
        let mut clock = MockClock::new();
        clock.expect_utc().returning(fixed_now);
        let service = BookingService::new(
            Arc::new(self.bookings),
            Arc::new(self.units),
            Arc::new(self.users),
            Arc::new(self.events),
            notifier,
            Arc::new(clock),
        );
        (service, self.counter)
    }
}

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).single().expect("valid timestamp")
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, d).expect("valid date")
}

fn sample_unit() -> Unit {
    Unit::new(
        UnitDraft {
            number_of_rooms: 2,
            accommodation_type: AccommodationType::Flat,
            floor: 1,
            base_cost: Money::from_cents(10_000),
            final_cost: None,
            description: "Flat".to_owned(),
            owner_id: UserId::random(),
        },
        fixed_now(),
    )
    .expect("valid unit")
}

fn sample_user() -> User {
    User::new("renter@example.com", "Renter", fixed_now()).expect("valid user")
}

fn request_for(unit: &Unit, user: &User, start: u32, end: u32) -> CreateBookingRequest {
    CreateBookingRequest {
        unit_id: unit.id,
        user_id: user.id,
        start_date: day(start),
        end_date: day(end),
    }
}

#[tokio::test]
async fn create_booking_persists_pending_hold_and_signals_once() {
    let mut harness = Harness::new();
    let unit = sample_unit();
    let user = sample_user();
    let request = request_for(&unit, &user, 1, 3);

    let unit_clone = unit.clone();
    harness
        .units
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(unit_clone)));
    let user_clone = user.clone();
    harness
        .users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(user_clone)));
    harness
        .bookings
        .expect_find_conflicting()
        .times(1)
        .return_once(|_, _, _| Ok(Vec::new()));
    harness
        .bookings
        .expect_save()
        .times(1)
        .return_once(|_| Ok(()));

    let (service, counter) = harness.build();
    let booking = service
        .create_booking(request)
        .await
        .expect("booking created");

    assert_eq!(booking.status, BookingStatus::Pending);
    // 100.00/day over two days.
    assert_eq!(booking.total_cost, Money::from_cents(20_000));
    assert_eq!(booking.expires_at, Some(fixed_now() + HOLD_DURATION));
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn create_booking_charges_one_day_minimum_for_zero_length_stay() {
    let mut harness = Harness::new();
    let unit = sample_unit();
    let user = sample_user();
    let request = request_for(&unit, &user, 1, 1);

    let unit_clone = unit.clone();
    harness
        .units
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(unit_clone)));
    harness
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user)));
    harness
        .bookings
        .expect_find_conflicting()
        .return_once(|_, _, _| Ok(Vec::new()));
    harness.bookings.expect_save().return_once(|_| Ok(()));

    let (service, _) = harness.build();
    let booking = service
        .create_booking(request)
        .await
        .expect("booking created");

    assert_eq!(booking.total_cost, Money::from_cents(10_000));
}

#[tokio::test]
async fn create_booking_fails_not_found_for_missing_unit() {
    let mut harness = Harness::new();
    harness.units.expect_find_by_id().return_once(|_| Ok(None));
    harness.bookings.expect_save().times(0);

    let (service, counter) = harness.build();
    let error = service
        .create_booking(CreateBookingRequest {
            unit_id: UnitId::random(),
            user_id: UserId::random(),
            start_date: day(1),
            end_date: day(3),
        })
        .await
        .expect_err("missing unit");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert!(error.message().contains("unit"));
    assert_eq!(counter.count(), 0);
}

#[tokio::test]
async fn create_booking_fails_not_found_for_missing_user() {
    let mut harness = Harness::new();
    let unit = sample_unit();
    let unit_id = unit.id;
    harness
        .units
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(unit)));
    harness.users.expect_find_by_id().return_once(|_| Ok(None));
    harness.bookings.expect_save().times(0);

    let (service, _) = harness.build();
    let error = service
        .create_booking(CreateBookingRequest {
            unit_id,
            user_id: UserId::random(),
            start_date: day(1),
            end_date: day(3),
        })
        .await
        .expect_err("missing user");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert!(error.message().contains("user"));
}

#[tokio::test]
async fn create_booking_fails_conflict_when_range_overlaps() {
    let mut harness = Harness::new();
    let unit = sample_unit();
    let user = sample_user();
    let request = request_for(&unit, &user, 2, 4);
    let existing = Booking::pending_hold(
        unit.id,
        user.id,
        day(1),
        day(3),
        Money::from_cents(10_000),
        fixed_now(),
    );

    let unit_clone = unit.clone();
    harness
        .units
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(unit_clone)));
    harness
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user)));
    harness
        .bookings
        .expect_find_conflicting()
        .return_once(move |_, _, _| Ok(vec![existing]));
    harness.bookings.expect_save().times(0);

    let (service, counter) = harness.build();
    let error = service
        .create_booking(request)
        .await
        .expect_err("conflicting range");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(counter.count(), 0);
}

#[tokio::test]
async fn cancel_booking_cancels_active_statuses() {
    for status in [BookingStatus::Pending, BookingStatus::Confirmed] {
        let mut harness = Harness::new();
        let mut existing = Booking::pending_hold(
            UnitId::random(),
            UserId::random(),
            day(1),
            day(3),
            Money::from_cents(10_000),
            fixed_now(),
        );
        existing.status = status;
        let id = existing.id;

        harness
            .bookings
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        harness
            .bookings
            .expect_save()
            .times(1)
            .withf(|b| b.status == BookingStatus::Cancelled)
            .return_once(|_| Ok(()));

        let (service, counter) = harness.build();
        let cancelled = service.cancel_booking(id).await.expect("cancel succeeds");
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.expires_at, None);
        assert_eq!(counter.count(), 1);
    }
}

#[tokio::test]
async fn cancel_booking_rejects_terminal_statuses() {
    for status in [BookingStatus::Cancelled, BookingStatus::Expired] {
        let mut harness = Harness::new();
        let mut existing = Booking::pending_hold(
            UnitId::random(),
            UserId::random(),
            day(1),
            day(3),
            Money::from_cents(10_000),
            fixed_now(),
        );
        existing.status = status;
        let id = existing.id;

        harness
            .bookings
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        harness.bookings.expect_save().times(0);

        let (service, counter) = harness.build();
        let error = service.cancel_booking(id).await.expect_err("terminal");
        assert_eq!(error.code(), ErrorCode::InvalidTransition);
        assert_eq!(counter.count(), 0);
    }
}

#[tokio::test]
async fn cancel_booking_fails_not_found_for_unknown_id() {
    let mut harness = Harness::new();
    harness
        .bookings
        .expect_find_by_id()
        .return_once(|_| Ok(None));

    let (service, _) = harness.build();
    let error = service
        .cancel_booking(BookingId::random())
        .await
        .expect_err("unknown booking");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn confirm_booking_confirms_pending_only() {
    let mut harness = Harness::new();
    let existing = Booking::pending_hold(
        UnitId::random(),
        UserId::random(),
        day(1),
        day(3),
        Money::from_cents(10_000),
        fixed_now(),
    );
    let id = existing.id;
    harness
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    harness
        .bookings
        .expect_save()
        .times(1)
        .withf(|b| b.status == BookingStatus::Confirmed)
        .return_once(|_| Ok(()));

    let (service, counter) = harness.build();
    let confirmed = service.confirm_booking(id).await.expect("confirm");
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert_eq!(confirmed.expires_at, None);
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn confirm_booking_rejects_non_pending() {
    for status in [
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Expired,
    ] {
        let mut harness = Harness::new();
        let mut existing = Booking::pending_hold(
            UnitId::random(),
            UserId::random(),
            day(1),
            day(3),
            Money::from_cents(10_000),
            fixed_now(),
        );
        existing.status = status;
        let id = existing.id;

        harness
            .bookings
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        harness.bookings.expect_save().times(0);

        let (service, _) = harness.build();
        let error = service.confirm_booking(id).await.expect_err("non-pending");
        assert_eq!(error.code(), ErrorCode::InvalidTransition);
    }
}

#[tokio::test]
async fn audit_failures_do_not_fail_the_mutation() {
    let mut harness = Harness::new();
    harness.events = MockEventLog::new();
    harness
        .events
        .expect_record()
        .returning(|_| Err(crate::domain::ports::EventLogError::append("log down")));

    let existing = Booking::pending_hold(
        UnitId::random(),
        UserId::random(),
        day(1),
        day(3),
        Money::from_cents(10_000),
        fixed_now(),
    );
    let id = existing.id;
    harness
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    harness.bookings.expect_save().return_once(|_| Ok(()));

    let (service, _) = harness.build();
    service
        .cancel_booking(id)
        .await
        .expect("cancel succeeds despite audit failure");
}

#[tokio::test]
async fn storage_connection_failures_map_to_service_unavailable() {
    let mut harness = Harness::new();
    harness
        .bookings
        .expect_find_by_id()
        .return_once(|_| Err(BookingRepositoryError::connection("pool down")));

    let (service, _) = harness.build();
    let error = service
        .get_booking(BookingId::random())
        .await
        .expect_err("store down");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
