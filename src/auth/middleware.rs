use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, HttpResponse,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;
use std::rc::Rc;
use uuid::Uuid;

use crate::auth::session;
use crate::auth::token::verify_token;
use crate::error::AppError;

/// Identity attached to the request once the guard has accepted it.
///
/// Handlers read this through the `AuthenticatedUser` extractor; `token` is
/// kept so logout can revoke exactly the session that made the call.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub token: String,
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    // Rc because the session lookup forces the call into an owned future
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Registration and login are reachable without a session
        let path = req.path();
        if path == "/api/auth/register" || path == "/api/auth/login" {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) });
        }

        let service = Rc::clone(&self.service);

        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.to_owned());

        Box::pin(async move {
            // A rejection is rendered into a complete response right here
            // rather than returned as a service-chain error, so it reaches
            // in-process callers (the test harness) exactly as it would
            // reach a network client.
            let outcome: Result<AuthSession, AppError> = async {
                let token = bearer
                    .ok_or_else(|| AppError::Unauthenticated("Authentication required".into()))?;

                let claims = verify_token(&token)?;

                let pool = req
                    .app_data::<web::Data<PgPool>>()
                    .ok_or_else(|| AppError::Internal("Database pool not configured".into()))?
                    .clone();

                // A valid signature is not enough: the token must still be
                // registered as an active session. Logout removes the row, so a
                // revoked token fails here with the same message as a bad one.
                if !session::exists(&pool, claims.sub, &token).await? {
                    return Err(AppError::Unauthenticated("Invalid or expired token".into()));
                }

                Ok(AuthSession {
                    user_id: claims.sub,
                    token,
                })
            }
            .await;

            match outcome {
                Ok(session) => {
                    req.extensions_mut().insert(session);
                    service
                        .call(req)
                        .await
                        .map(|res| res.map_into_left_body())
                }
                Err(err) => {
                    let response = HttpResponse::from_error(err).map_into_right_body();
                    Ok(req.into_response(response))
                }
            }
        })
    }
}
