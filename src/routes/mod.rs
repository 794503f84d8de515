pub mod auth;
pub mod health;
pub mod tasks;

use crate::auth::AuthMiddleware;
use actix_web::{web, HttpResponse};
use serde_json::json;

/// Fallback for requests that match no route, including unknown `/api/*`
/// paths. Wired as the application-level default service so the error body
/// shape stays consistent with everything else.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "Route not found" }))
}

/// Mounts every route under `/api`.
///
/// The auth guard wraps only the `/auth` and `/tasks` scopes; everything
/// else skips it. Unmatched paths inside a guarded scope still pass the
/// guard before falling through to `not_found`, so route probing under
/// those prefixes needs a valid session.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health)
            .service(
                web::scope("/auth")
                    .wrap(AuthMiddleware)
                    .service(auth::register)
                    .service(auth::login)
                    .service(auth::me)
                    .service(auth::logout),
            )
            .service(
                web::scope("/tasks")
                    .wrap(AuthMiddleware)
                    .service(tasks::task_stats)
                    .service(tasks::list_tasks)
                    .service(tasks::create_task)
                    .service(tasks::get_task)
                    .service(tasks::update_task)
                    .service(tasks::delete_task),
            ),
    );
}
