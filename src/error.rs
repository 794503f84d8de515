//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management so every failure a handler
//! can produce (bad input, missing credentials, a revoked session, an
//! unknown record, a database fault) maps to one HTTP status and one JSON
//! body shape: `{"error": "<message>"}`.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert
//! application errors into HTTP responses, and provides `From` impls for
//! `sqlx::Error`, `validator::ValidationErrors` and
//! `jsonwebtoken::errors::Error` so handlers can use the `?` operator.
//! Server-side faults are logged with their detail but answered with a
//! generic body.

use actix_web::{error::ResponseError, web, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or out-of-range input (HTTP 400).
    Validation(String),
    /// Registration attempted with an email that is already taken (HTTP 400).
    DuplicateEmail,
    /// Missing, invalid, expired or revoked session token (HTTP 401).
    Unauthenticated(String),
    /// Login failure; identical whether the email is unknown or the
    /// password is wrong (HTTP 401).
    InvalidCredentials,
    /// Requested record does not exist for this caller (HTTP 404).
    NotFound(String),
    /// Error originating from the database (HTTP 500, detail logged only).
    Database(String),
    /// Unexpected server-side error (HTTP 500, detail logged only).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::DuplicateEmail => write!(f, "Email already registered"),
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::DuplicateEmail => HttpResponse::BadRequest().json(json!({
                "error": "Email already registered"
            })),
            AppError::Unauthenticated(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::InvalidCredentials => HttpResponse::Unauthorized().json(json!({
                "error": "Invalid credentials"
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            // Internal detail stays in the log; the client gets a fixed body.
            AppError::Database(_) | AppError::Internal(_) => {
                log::error!("{}", self);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` maps to `NotFound`; a unique-constraint violation
/// (SQLSTATE 23505, the `users.email` index) maps to `DuplicateEmail` so a
/// registration race loses cleanly; everything else is a `Database` error.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err)
                if db_err.code().is_some_and(|code| code.as_ref() == "23505") =>
            {
                AppError::DuplicateEmail
            }
            other => AppError::Database(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Token processing failures never reveal which check failed.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthenticated("Invalid or expired token".into())
    }
}

/// JSON body deserialization failures become 400s with the standard error
/// body instead of actix's default plain-text response.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        actix_web::Error::from(AppError::Validation(err.to_string()))
    })
}

/// Query-string deserialization failures (unknown enum value, non-numeric
/// page) become 400s with the standard error body.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        actix_web::Error::from(AppError::Validation(err.to_string()))
    })
}

/// A path id that fails to parse (e.g. a malformed task UUID) behaves like
/// a missing record, indistinguishable from an id the caller does not own.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err, _req| {
        actix_web::Error::from(AppError::NotFound("Task not found".into()))
    })
}
