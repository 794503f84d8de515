use crate::{
    auth::{
        hash_password, issue_token, session, verify_password, AuthResponse, AuthenticatedUser,
        LoginRequest, RegisterRequest,
    },
    error::AppError,
    models::User,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Register a new user
///
/// Creates a new user account, opens a session and returns the sanitized
/// user together with the session token.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let mut register_data = register_data.into_inner();

    // Emails are matched case-insensitively by storing them lowercased
    register_data.email = register_data.email.trim().to_lowercase();

    // Validate input
    register_data.validate()?;

    // Check if email already exists; the unique index backstops the race
    // where two registrations pass this check at the same time
    let existing_user: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&register_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing_user.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    // Hash password
    let password_hash = hash_password(&register_data.password)?;

    // Insert new user
    let user: User = sqlx::query_as(
        "INSERT INTO users (id, name, email, password_hash)
         VALUES ($1, $2, $3, $4)
         RETURNING id, name, email, password_hash, role, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(&register_data.name)
    .bind(&register_data.email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    let token = issue_token(&pool, &user).await?;

    Ok(HttpResponse::Created().json(AuthResponse { user, token }))
}

/// Login user
///
/// Authenticates a user, opens a new session and returns its token. An
/// unknown email and a wrong password produce the same response.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let email = login_data.email.trim().to_lowercase();

    // Get user from database
    let user: Option<User> = sqlx::query_as(
        "SELECT id, name, email, password_hash, role, created_at FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&**pool)
    .await?;

    match user {
        Some(user) => {
            // Verify password
            if verify_password(&login_data.password, &user.password_hash)? {
                let token = issue_token(&pool, &user).await?;
                Ok(HttpResponse::Ok().json(AuthResponse { user, token }))
            } else {
                Err(AppError::InvalidCredentials)
            }
        }
        None => Err(AppError::InvalidCredentials),
    }
}

/// Current user
///
/// Returns the account behind the presented session token.
#[get("/me")]
pub async fn me(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user: Option<User> = sqlx::query_as(
        "SELECT id, name, email, password_hash, role, created_at FROM users WHERE id = $1",
    )
    .bind(auth.user_id)
    .fetch_optional(&**pool)
    .await?;

    match user {
        Some(user) => Ok(HttpResponse::Ok().json(json!({ "user": user }))),
        None => Err(AppError::Unauthenticated("Invalid or expired token".into())),
    }
}

/// Logout
///
/// Revokes the presented session token. The token keeps a valid signature
/// until its expiry but stops authenticating immediately; other sessions of
/// the same user are unaffected.
#[post("/logout")]
pub async fn logout(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    session::remove(&pool, auth.user_id, &auth.token).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Logged out successfully" })))
}
