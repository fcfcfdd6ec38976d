use chrono::{DateTime, Utc};
use log::debug;
use sqlx::{FromRow, SqliteConnection};
use tradepost_common::Secret;

use crate::{
    db_types::{NewUser, User, UserId},
    traits::UserApiError,
};

/// Raw row shape for the `users` table. Converted into [`User`] immediately so that the password hash is wrapped
/// in [`Secret`] before it can reach any Debug output.
#[derive(Debug, Clone, FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: Secret::new(row.password_hash),
            created_at: row.created_at,
        }
    }
}

/// Inserts a new user with a freshly generated id. A username collision surfaces as
/// [`UserApiError::UsernameTaken`] via the UNIQUE constraint.
pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, UserApiError> {
    let id = UserId::random();
    let row: UserRow = sqlx::query_as(
        r#"
            INSERT INTO users (id, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(&id)
    .bind(&user.username)
    .bind(user.password_hash.reveal())
    .fetch_one(conn)
    .await?;
    debug!("🗃️ User [{}] registered with id {id}", row.username);
    Ok(row.into())
}

pub async fn fetch_user_by_username(
    username: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, UserApiError> {
    let row: Option<UserRow> =
        sqlx::query_as("SELECT * FROM users WHERE username = $1").bind(username).fetch_optional(conn).await?;
    Ok(row.map(User::from))
}

pub async fn fetch_user_by_id(id: &UserId, conn: &mut SqliteConnection) -> Result<Option<User>, UserApiError> {
    let row: Option<UserRow> =
        sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(row.map(User::from))
}
