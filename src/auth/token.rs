use crate::error::AppError;
use crate::models::{Role, User};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token, the user's unique identifier.
    pub sub: Uuid,
    /// Email of the user at the time the token was issued.
    pub email: String,
    /// Role of the user at the time the token was issued.
    pub role: Role,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
    /// Random token identifier. Claims are otherwise deterministic, so two
    /// logins within the same second would mint the same token string and
    /// collide in the session registry.
    pub jti: Uuid,
}

/// Generates a JWT for a given user.
///
/// The token is set to expire in 7 days. It requires the `JWT_SECRET`
/// environment variable to be set for signing. Possession of a validly
/// signed token is not enough to authenticate: the token must also be
/// present in the `sessions` table, which is what logout removes.
///
/// # Returns
/// A `Result` containing the JWT string if successful.
/// Returns `AppError::Internal` if `JWT_SECRET` is not set or encoding fails.
pub fn generate_token(user: &User) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expiration = now
        .checked_add_signed(chrono::Duration::days(7))
        .ok_or_else(|| AppError::Internal("Token expiry overflowed".into()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp() as usize,
        exp: expiration,
        jti: Uuid::new_v4(),
    };

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal("JWT_SECRET not set".into()))?;

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

/// Verifies a JWT string and decodes its claims.
///
/// Default validation checks are applied (signature, expiration). All
/// verification failures collapse into the same `Unauthenticated` message so
/// a caller cannot distinguish a malformed token from an expired one.
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal("JWT_SECRET not set".into()))?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthenticated("Invalid or expired token".into()))
}

/// Serializes tests that mutate the `JWT_SECRET` process environment.
/// `config` tests read the same variable, so they share this lock.
#[cfg(test)]
pub(crate) static JWT_ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
