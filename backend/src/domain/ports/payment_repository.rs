//! Port for payment record persistence.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::payment::Payment;

/// Errors surfaced by payment store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentRepositoryError {
    /// Store connection could not be established.
    #[error("payment store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("payment store query failed: {message}")]
    Query { message: String },
}

impl PaymentRepositoryError {
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

/// Persistence port for payment records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Append a payment record.
    async fn save(&self, payment: &Payment) -> Result<(), PaymentRepositoryError>;
}
