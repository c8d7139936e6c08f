//! Storage adapters.
//!
//! The core reaches storage only through the domain ports; this module
//! provides the in-process implementation used by the service binary and the
//! integration tests. A database-backed adapter would slot in behind the
//! same traits.

mod memory;

pub use memory::{
    InMemoryBookingRepository, InMemoryEventLog, InMemoryPaymentRepository,
    InMemoryUnitRepository, InMemoryUserRepository, MemoryStore,
};
