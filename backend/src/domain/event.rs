//! Audit event records.
//!
//! Services append an event per mutation. Storage of the log is an external
//! concern; failures there are logged and never fail the business operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub data: String,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Build an event for a mutation on an entity.
    pub fn new(
        event_type: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: Uuid,
        data: impl Into<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            entity_type: entity_type.into(),
            entity_id,
            data: data.into(),
            recorded_at,
        }
    }
}
