//! User account service.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::error::Error;
use crate::domain::event::AuditEvent;
use crate::domain::ports::{EventLog, UserRepository, UserRepositoryError};
use crate::domain::user::{User, UserId};

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

/// User account service.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventLog>,
    clock: Arc<dyn Clock>,
}

impl UserService {
    /// Assemble the service from its collaborators.
    pub fn new(
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventLog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            events,
            clock,
        }
    }

    /// Register a user. Emails are unique; a duplicate fails with `Conflict`.
    pub async fn create_user(
        &self,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<User, Error> {
        let email = email.into();
        if self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(Error::conflict(format!(
                "user with email {email} already exists"
            )));
        }

        let user = User::new(email, name, self.clock.utc())
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.users.save(&user).await.map_err(map_user_error)?;

        info!(user_id = %user.id, "user created");
        let event = AuditEvent::new(
            "USER_CREATED",
            "User",
            user.id.as_uuid(),
            format!("user created with email {}", user.email),
            self.clock.utc(),
        );
        if let Err(error) = self.events.record(&event).await {
            warn!(%error, "audit event dropped");
        }

        Ok(user)
    }

    /// Fetch a user by id.
    pub async fn get_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(&id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }
}
