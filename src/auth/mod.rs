pub mod extractors;
pub mod middleware;
pub mod password;
pub mod session;
pub mod token;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::error::AppError;
use crate::models::User;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Issues a session token for the user: signs the claims and records the
/// token in the session registry so the guard accepts it until logout.
pub async fn issue_token(pool: &PgPool, user: &User) -> Result<String, AppError> {
    let token = token::generate_token(user)?;
    session::insert(pool, user.id, &token).await?;
    Ok(token)
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name for the new account.
    /// Must be between 2 and 50 characters.
    #[validate(length(
        min = 2,
        max = 50,
        message = "Name must be between 2 and 50 characters"
    ))]
    pub name: String,
    /// Email address for the new account.
    /// Must be a valid email format; stored lowercased.
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    /// Password for the new account.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Represents the payload for a user login request.
///
/// Login input is not shape-validated: any credential pair that does not
/// match an account gets the same 401 response.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// User's email address.
    pub email: String,
    /// User's password.
    pub password: String,
}

/// Response structure after successful authentication (login or registration).
/// Contains the sanitized user record and the session token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The authenticated user. The password hash is never serialized.
    pub user: User,
    /// The JWT (JSON Web Token) for session authentication.
    pub token: String,
}
