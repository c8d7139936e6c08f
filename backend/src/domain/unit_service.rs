//! Unit catalogue service.
//!
//! Owns unit CRUD and search. Every mutation can change how many units are
//! available, so each one publishes a change signal after persisting.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::error::Error;
use crate::domain::event::AuditEvent;
use crate::domain::notifier::ChangeNotifier;
use crate::domain::ports::{
    EventLog, UnitPage, UnitRepository, UnitRepositoryError, UnitSearchFilter, UserRepository,
    UserRepositoryError,
};
use crate::domain::unit::{Unit, UnitDraft, UnitId};

fn map_unit_error(error: UnitRepositoryError) -> Error {
    match error {
        UnitRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("unit store unavailable: {message}"))
        }
        UnitRepositoryError::Query { message } => {
            Error::internal(format!("unit store error: {message}"))
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

/// Unit catalogue service.
pub struct UnitService {
    units: Arc<dyn UnitRepository>,
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventLog>,
    notifier: Arc<ChangeNotifier>,
    clock: Arc<dyn Clock>,
}

impl UnitService {
    /// Assemble the service from its collaborators.
    pub fn new(
        units: Arc<dyn UnitRepository>,
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventLog>,
        notifier: Arc<ChangeNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            units,
            users,
            events,
            notifier,
            clock,
        }
    }

    /// List a new unit. The owner must exist; validation errors surface as
    /// `InvalidRequest`.
    pub async fn create_unit(&self, draft: UnitDraft) -> Result<Unit, Error> {
        self.require_owner(&draft).await?;

        let unit = Unit::new(draft, self.clock.utc())
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.units.save(&unit).await.map_err(map_unit_error)?;

        info!(unit_id = %unit.id, rooms = unit.number_of_rooms, "unit created");
        self.record_event(
            "UNIT_CREATED",
            unit.id,
            format!("unit created with {} rooms", unit.number_of_rooms),
        )
        .await;
        self.notifier.publish();

        Ok(unit)
    }

    /// Fetch a unit by id.
    pub async fn get_unit(&self, id: UnitId) -> Result<Unit, Error> {
        self.require_unit(id).await
    }

    /// Replace a unit's fields, including the final cost.
    pub async fn update_unit(&self, id: UnitId, draft: UnitDraft) -> Result<Unit, Error> {
        let mut unit = self.require_unit(id).await?;
        self.require_owner(&draft).await?;

        unit.apply_update(draft)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.units.save(&unit).await.map_err(map_unit_error)?;

        info!(unit_id = %unit.id, "unit updated");
        self.record_event("UNIT_UPDATED", unit.id, "unit updated")
            .await;
        self.notifier.publish();

        Ok(unit)
    }

    /// Delete a unit.
    pub async fn delete_unit(&self, id: UnitId) -> Result<(), Error> {
        let existed = self.units.delete(&id).await.map_err(map_unit_error)?;
        if !existed {
            return Err(Error::not_found(format!("unit {id} not found")));
        }

        info!(unit_id = %id, "unit deleted");
        self.record_event("UNIT_DELETED", id, "unit deleted").await;
        self.notifier.publish();

        Ok(())
    }

    /// Search units with filters, optional stay range, and paging.
    pub async fn search_units(&self, filter: UnitSearchFilter) -> Result<UnitPage, Error> {
        self.units.search(&filter).await.map_err(map_unit_error)
    }

    /// Count every listed unit, for the stats endpoint.
    pub async fn count_total_units(&self) -> Result<u64, Error> {
        self.units.count_total().await.map_err(map_unit_error)
    }

    async fn require_unit(&self, id: UnitId) -> Result<Unit, Error> {
        self.units
            .find_by_id(&id)
            .await
            .map_err(map_unit_error)?
            .ok_or_else(|| Error::not_found(format!("unit {id} not found")))
    }

    async fn require_owner(&self, draft: &UnitDraft) -> Result<(), Error> {
        self.users
            .find_by_id(&draft.owner_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {} not found", draft.owner_id)))?;
        Ok(())
    }

    async fn record_event(&self, event_type: &str, id: UnitId, data: impl Into<String>) {
        let event = AuditEvent::new(event_type, "Unit", id.as_uuid(), data, self.clock.utc());
        if let Err(error) = self.events.record(&event).await {
            warn!(%error, event_type, "audit event dropped");
        }
    }
}

#[cfg(test)]
#[path = "unit_service_tests.rs"]
mod tests;
