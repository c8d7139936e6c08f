//! In-memory storage shared by every repository adapter.
//!
//! One [`MemoryStore`] plays the role of the database: the per-aggregate
//! repositories are thin views over it so cross-aggregate queries (the
//! availability count joins units against bookings) observe one consistent
//! dataset.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::booking::{Booking, BookingId};
use crate::domain::event::AuditEvent;
use crate::domain::payment::{Payment, PaymentId};
use crate::domain::ports::{
    BookingRepository, BookingRepositoryError, EventLog, EventLogError, PaymentRepository,
    PaymentRepositoryError, SortDirection, UnitPage, UnitRepository, UnitRepositoryError,
    UnitSearchFilter, UnitSortKey, UserRepository, UserRepositoryError,
};
use crate::domain::unit::{Unit, UnitId};
use crate::domain::user::{User, UserId};

#[derive(Default)]
struct Tables {
    units: HashMap<UnitId, Unit>,
    bookings: HashMap<BookingId, Booking>,
    users: HashMap<UserId, User>,
    payments: HashMap<PaymentId, Payment>,
    events: Vec<AuditEvent>,
}

/// Process-local dataset backing all repository adapters.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        match self.tables.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        match self.tables.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Number of recorded audit events. Exposed for tests.
    pub fn audit_event_count(&self) -> usize {
        self.read().events.len()
    }
}

fn unit_has_active_booking(tables: &Tables, unit_id: UnitId) -> bool {
    tables
        .bookings
        .values()
        .any(|b| b.unit_id == unit_id && b.status.is_active())
}

fn unit_has_active_booking_overlapping(
    tables: &Tables,
    unit_id: UnitId,
    start: NaiveDate,
    end: NaiveDate,
) -> bool {
    tables
        .bookings
        .values()
        .any(|b| b.unit_id == unit_id && b.status.is_active() && b.overlaps(start, end))
}

fn matches_filter(tables: &Tables, unit: &Unit, filter: &UnitSearchFilter) -> bool {
    if let Some(rooms) = filter.number_of_rooms {
        if unit.number_of_rooms != rooms {
            return false;
        }
    }
    if let Some(kind) = filter.accommodation_type {
        if unit.accommodation_type != kind {
            return false;
        }
    }
    if let Some(floor) = filter.floor {
        if unit.floor != floor {
            return false;
        }
    }
    if let Some(min) = filter.min_cost {
        if unit.final_cost < min {
            return false;
        }
    }
    if let Some(max) = filter.max_cost {
        if unit.final_cost > max {
            return false;
        }
    }
    if let Some((start, end)) = filter.stay {
        if unit_has_active_booking_overlapping(tables, unit.id, start, end) {
            return false;
        }
    }
    true
}

fn sort_units(units: &mut [Unit], key: UnitSortKey, direction: SortDirection) {
    units.sort_by(|a, b| {
        let ordering = match key {
            UnitSortKey::CreatedAt => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
            UnitSortKey::FinalCost => a.final_cost.cmp(&b.final_cost).then(a.id.cmp(&b.id)),
            UnitSortKey::NumberOfRooms => a
                .number_of_rooms
                .cmp(&b.number_of_rooms)
                .then(a.id.cmp(&b.id)),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Unit repository view over a [`MemoryStore`].
#[derive(Clone)]
pub struct InMemoryUnitRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryUnitRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UnitRepository for InMemoryUnitRepository {
    async fn save(&self, unit: &Unit) -> Result<(), UnitRepositoryError> {
        self.store.write().units.insert(unit.id, unit.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UnitId) -> Result<Option<Unit>, UnitRepositoryError> {
        Ok(self.store.read().units.get(id).cloned())
    }

    async fn delete(&self, id: &UnitId) -> Result<bool, UnitRepositoryError> {
        Ok(self.store.write().units.remove(id).is_some())
    }

    async fn search(&self, filter: &UnitSearchFilter) -> Result<UnitPage, UnitRepositoryError> {
        let tables = self.store.read();
        let mut matched: Vec<Unit> = tables
            .units
            .values()
            .filter(|unit| matches_filter(&tables, unit, filter))
            .cloned()
            .collect();
        drop(tables);

        sort_units(&mut matched, filter.sort_key, filter.sort_direction);

        let total = matched.len() as u64;
        let size = filter.size.max(1) as usize;
        let offset = (filter.page as usize).saturating_mul(size);
        let items = matched.into_iter().skip(offset).take(size).collect();

        Ok(UnitPage {
            items,
            page: filter.page,
            size: filter.size,
            total,
        })
    }

    async fn count_available(&self) -> Result<u64, UnitRepositoryError> {
        let tables = self.store.read();
        let count = tables
            .units
            .keys()
            .filter(|id| !unit_has_active_booking(&tables, **id))
            .count();
        Ok(count as u64)
    }

    async fn count_total(&self) -> Result<u64, UnitRepositoryError> {
        Ok(self.store.read().units.len() as u64)
    }
}

/// Booking repository view over a [`MemoryStore`].
#[derive(Clone)]
pub struct InMemoryBookingRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryBookingRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn save(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        self.store
            .write()
            .bookings
            .insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(self.store.read().bookings.get(id).cloned())
    }

    async fn find_conflicting(
        &self,
        unit_id: &UnitId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        Ok(self
            .store
            .read()
            .bookings
            .values()
            .filter(|b| b.unit_id == *unit_id && b.status.is_active() && b.overlaps(start, end))
            .cloned()
            .collect())
    }

    async fn find_expired_pending(
        &self,
        before: DateTime<Utc>,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        Ok(self
            .store
            .read()
            .bookings
            .values()
            .filter(|b| {
                b.status == crate::domain::booking::BookingStatus::Pending
                    && b.expires_at.is_some_and(|at| at < before)
            })
            .cloned()
            .collect())
    }
}

/// User repository view over a [`MemoryStore`].
#[derive(Clone)]
pub struct InMemoryUserRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryUserRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError> {
        self.store.write().users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.store.read().users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .store
            .read()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

/// Payment repository view over a [`MemoryStore`].
#[derive(Clone)]
pub struct InMemoryPaymentRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryPaymentRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, payment: &Payment) -> Result<(), PaymentRepositoryError> {
        self.store
            .write()
            .payments
            .insert(payment.id, payment.clone());
        Ok(())
    }
}

/// Audit log view over a [`MemoryStore`].
#[derive(Clone)]
pub struct InMemoryEventLog {
    store: Arc<MemoryStore>,
}

impl InMemoryEventLog {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    async fn record(&self, event: &AuditEvent) -> Result<(), EventLogError> {
        self.store.write().events.push(event.clone());
        Ok(())
    }
}
