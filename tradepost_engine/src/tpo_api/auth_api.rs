use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewUser, User, UserId},
    helpers::passwords,
    traits::{UserApiError, UserManagement},
};

/// Usernames shorter than this are rejected at registration.
pub const MIN_USERNAME_LENGTH: usize = 4;

/// Registration and credential checking.
pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> AuthApi<B>
where B: UserManagement
{
    /// Creates a new account. The username is trimmed and must be at least [`MIN_USERNAME_LENGTH`] characters;
    /// the password is hashed with Argon2id before it goes anywhere near the store.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, UserApiError> {
        let username = username.trim();
        if username.chars().count() < MIN_USERNAME_LENGTH {
            debug!("🔑️ Rejecting registration: username [{username}] is too short");
            return Err(UserApiError::UsernameTooShort(MIN_USERNAME_LENGTH));
        }
        let hash = passwords::hash_password(password)?;
        let user = self.db.create_user(NewUser::new(username, hash)).await?;
        debug!("🔑️ New user [{}] registered with id {}", user.username, user.id);
        Ok(user)
    }

    /// Checks the given credentials and returns the matching user.
    ///
    /// An unknown username and a wrong password are distinct errors, matching the responses the login endpoint
    /// has always returned.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, UserApiError> {
        let user = self.db.fetch_user_by_username(username).await?.ok_or(UserApiError::UserNotFound)?;
        if !passwords::verify_password(password, user.password_hash.reveal())? {
            debug!("🔑️ Password mismatch for [{}]", user.username);
            return Err(UserApiError::InvalidCredentials);
        }
        debug!("🔑️ User [{}] authenticated", user.username);
        Ok(user)
    }

    pub async fn fetch_user(&self, id: &UserId) -> Result<Option<User>, UserApiError> {
        self.db.fetch_user_by_id(id).await
    }
}
