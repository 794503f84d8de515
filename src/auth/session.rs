//! Server-side session registry.
//!
//! A JWT alone does not authenticate a request. Every issued token is also
//! recorded in the `sessions` table, and the auth middleware requires the
//! presented token to still be there. Logout deletes the row, which
//! invalidates the token immediately even though its signature stays valid
//! until the 7-day expiry.

use crate::error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Records a freshly issued token as an active session for the user.
pub async fn insert(pool: &PgPool, user_id: Uuid, token: &str) -> Result<(), AppError> {
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
        .bind(token)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Checks whether the token is an active session for the user.
///
/// The lookup also covers account deletion: a removed user has no session
/// rows left (cascade), so their outstanding tokens stop working.
pub async fn exists(pool: &PgPool, user_id: Uuid, token: &str) -> Result<bool, AppError> {
    let (found,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM sessions WHERE user_id = $1 AND token = $2)")
            .bind(user_id)
            .bind(token)
            .fetch_one(pool)
            .await?;
    Ok(found)
}

/// Revokes a single session. Other sessions of the same user stay active.
pub async fn remove(pool: &PgPool, user_id: Uuid, token: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND token = $2")
        .bind(user_id)
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}
