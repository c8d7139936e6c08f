//! Port for unit persistence and the availability count query.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::money::Money;
use crate::domain::unit::{AccommodationType, Unit, UnitId};

/// Errors surfaced by unit store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitRepositoryError {
    /// Store connection could not be established.
    #[error("unit store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("unit store query failed: {message}")]
    Query { message: String },
}

impl UnitRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Sort key accepted by the unit search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSortKey {
    #[default]
    CreatedAt,
    FinalCost,
    NumberOfRooms,
}

/// Sort direction accepted by the unit search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Filters and paging for the unit search query.
///
/// When `stay` is set, units with an active booking overlapping that range
/// (closed-interval predicate) are excluded from the results.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnitSearchFilter {
    pub number_of_rooms: Option<u32>,
    pub accommodation_type: Option<AccommodationType>,
    pub floor: Option<u32>,
    pub min_cost: Option<Money>,
    pub max_cost: Option<Money>,
    pub stay: Option<(NaiveDate, NaiveDate)>,
    pub sort_key: UnitSortKey,
    pub sort_direction: SortDirection,
    pub page: u32,
    pub size: u32,
}

/// One page of unit search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPage {
    pub items: Vec<Unit>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}

/// Persistence port for unit aggregates and availability queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitRepository: Send + Sync {
    /// Insert or replace a unit record.
    async fn save(&self, unit: &Unit) -> Result<(), UnitRepositoryError>;

    /// Fetch a unit by identifier.
    async fn find_by_id(&self, id: &UnitId) -> Result<Option<Unit>, UnitRepositoryError>;

    /// Delete a unit. Returns whether a record existed.
    async fn delete(&self, id: &UnitId) -> Result<bool, UnitRepositoryError>;

    /// Search units with filters, optional stay-range exclusion, and paging.
    async fn search(&self, filter: &UnitSearchFilter) -> Result<UnitPage, UnitRepositoryError>;

    /// Count units that currently have no PENDING or CONFIRMED booking.
    async fn count_available(&self) -> Result<u64, UnitRepositoryError>;

    /// Count every stored unit.
    async fn count_total(&self) -> Result<u64, UnitRepositoryError>;
}
