//! Port for the audit event log.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::event::AuditEvent;

/// Errors surfaced by audit log adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventLogError {
    /// The log backend rejected or failed the append.
    #[error("audit log append failed: {message}")]
    Append { message: String },
}

impl EventLogError {
    /// Helper for append failures.
    pub fn append(message: impl Into<String>) -> Self {
        Self::Append {
            message: message.into(),
        }
    }
}

/// Append-only audit log. Failures here must never fail the business
/// operation; callers log and continue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Append one audit event.
    async fn record(&self, event: &AuditEvent) -> Result<(), EventLogError>;
}
