use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Represents the role of a user account.
/// Corresponds to the `user_role` SQL enum.
///
/// Roles are never settable through the public API; registration always
/// creates a `User` and promotion happens directly in the database.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account, scoped to its own tasks.
    User,
    /// Administrative account.
    Admin,
}

/// Represents a user account as stored in the database.
///
/// The bcrypt hash never leaves the server: it is skipped during
/// serialization, so this struct can be embedded in API responses directly.
#[derive(Debug, Serialize, Clone, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier for the user (UUID v4).
    pub id: Uuid,
    /// Display name, between 2 and 50 characters.
    pub name: String,
    /// Email address, stored lowercased and unique across accounts.
    pub email: String,
    /// Bcrypt hash of the user's password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// The role of the account.
    pub role: Role,
    /// Timestamp of when the account was created.
    pub created_at: DateTime<Utc>,
}
