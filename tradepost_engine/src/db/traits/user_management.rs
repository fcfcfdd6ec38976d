use thiserror::Error;

use crate::db_types::{NewUser, User, UserId};

/// Behaviour of the identity store. Users are immutable once created, so the interface is create-and-fetch only.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Persists a new user. The username must be unique; a collision returns [`UserApiError::UsernameTaken`].
    async fn create_user(&self, user: NewUser) -> Result<User, UserApiError>;

    async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, UserApiError>;

    async fn fetch_user_by_id(&self, id: &UserId) -> Result<Option<User>, UserApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum UserApiError {
    #[error("Username must be at least {0} characters")]
    UsernameTooShort(usize),
    #[error("Username already taken!")]
    UsernameTaken,
    #[error("Incorrect Username")]
    UserNotFound,
    #[error("Incorrect password")]
    InvalidCredentials,
    #[error("Could not process password. {0}")]
    PasswordHash(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for UserApiError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(de) = &e {
            if de.is_unique_violation() {
                return UserApiError::UsernameTaken;
            }
        }
        UserApiError::DatabaseError(e.to_string())
    }
}
