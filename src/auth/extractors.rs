use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::middleware::AuthSession;
use crate::error::AppError;

/// Extracts the authenticated user's identity from request extensions.
///
/// This extractor is intended for routes protected by `AuthMiddleware`,
/// which validates the token, checks the session registry and inserts an
/// `AuthSession` into request extensions.
///
/// If no session is found in the extensions (e.g. the middleware did not
/// run), this extractor returns an `AppError::Unauthenticated` error.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub token: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError; // AppError converts into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthSession>().cloned() {
            Some(session) => ready(Ok(AuthenticatedUser {
                user_id: session.user_id,
                token: session.token,
            })),
            None => {
                let err = AppError::Unauthenticated("Authentication required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
