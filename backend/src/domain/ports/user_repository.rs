//! Port for user persistence.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::user::{User, UserId};

/// Errors surfaced by user store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserRepositoryError {
    /// Store connection could not be established.
    #[error("user store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user store query failed: {message}")]
    Query { message: String },
}

impl UserRepositoryError {
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

/// Persistence port for user aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or replace a user record.
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;
}
