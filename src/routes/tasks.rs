use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Task, TaskInput, TaskQuery, TaskStats, TaskUpdate},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, owner_id, created_at, updated_at";

/// Maps a client-facing sort field to a column. Anything outside the
/// whitelist falls back to the creation date, so user input never reaches
/// the SQL string itself.
fn sort_column(sort_by: Option<&str>) -> &'static str {
    match sort_by {
        Some("updatedAt") => "updated_at",
        Some("dueDate") => "due_date",
        Some("priority") => "priority",
        Some("status") => "status",
        Some("title") => "title",
        _ => "created_at",
    }
}

fn sort_direction(sort_order: Option<&str>) -> &'static str {
    match sort_order {
        Some("asc") => "ASC",
        _ => "DESC",
    }
}

/// Largest page size a single request can ask for.
const MAX_PAGE_SIZE: u32 = 100;

/// Normalizes raw page/limit query values. Zeroes floor to 1 and the limit
/// is capped, so the offset fits an i64 for any page number a query string
/// can carry.
fn page_window(page: Option<u32>, limit: Option<u32>) -> (i64, i64, i64) {
    let page = i64::from(page.unwrap_or(1).max(1));
    let limit = i64::from(limit.unwrap_or(10).clamp(1, MAX_PAGE_SIZE));
    let offset = (page - 1).saturating_mul(limit);
    (page, limit, offset)
}

/// Retrieves a page of tasks owned by the authenticated user.
///
/// Supports filtering by `status` and `priority`, sorting by a whitelisted
/// field (`createdAt` by default, descending) and page/limit pagination.
/// Other users' tasks are never visible here.
///
/// ## Query Parameters:
/// - `status` (optional): filter by status ("pending", "in-progress", "completed").
/// - `priority` (optional): filter by priority ("low", "medium", "high").
/// - `sortBy` (optional): "createdAt", "updatedAt", "dueDate", "priority", "status" or "title".
/// - `sortOrder` (optional): "asc" or "desc".
/// - `page` (optional): page number starting at 1.
/// - `limit` (optional): page size, default 10, capped at 100.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    query_params: web::Query<TaskQuery>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (page, limit, offset) = page_window(query_params.page, query_params.limit);

    // Filter clause is shared between the page query and the total count.
    // Only whitelisted column names are interpolated; values are bound.
    let mut filters = String::from("WHERE owner_id = $1");
    let mut param_count = 2;

    if query_params.status.is_some() {
        filters.push_str(&format!(" AND status = ${}", param_count));
        param_count += 1;
    }
    if query_params.priority.is_some() {
        filters.push_str(&format!(" AND priority = ${}", param_count));
        param_count += 1;
    }

    let sql = format!(
        "SELECT {} FROM tasks {} ORDER BY {} {} LIMIT ${} OFFSET ${}",
        TASK_COLUMNS,
        filters,
        sort_column(query_params.sort_by.as_deref()),
        sort_direction(query_params.sort_order.as_deref()),
        param_count,
        param_count + 1
    );

    let mut page_query = sqlx::query_as::<_, Task>(&sql).bind(auth.user_id);
    if let Some(status) = query_params.status {
        page_query = page_query.bind(status);
    }
    if let Some(priority) = query_params.priority {
        page_query = page_query.bind(priority);
    }
    let tasks = page_query
        .bind(limit)
        .bind(offset)
        .fetch_all(&**pool)
        .await?;

    let count_sql = format!("SELECT COUNT(*) FROM tasks {}", filters);
    let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql).bind(auth.user_id);
    if let Some(status) = query_params.status {
        count_query = count_query.bind(status);
    }
    if let Some(priority) = query_params.priority {
        count_query = count_query.bind(priority);
    }
    let (total,) = count_query.fetch_one(&**pool).await?;

    let pages = (total + limit - 1) / limit;

    Ok(HttpResponse::Ok().json(json!({
        "tasks": tasks,
        "pagination": {
            "page": page,
            "limit": limit,
            "total": total,
            "pages": pages
        }
    })))
}

/// Creates a new task owned by the authenticated user.
///
/// The owner is always the caller; there is no way to create a task for
/// someone else. Status defaults to "pending" and priority to "medium".
///
/// ## Responses:
/// - `201 Created`: the new `Task` object.
/// - `400 Bad Request`: invalid title, description or a due date in the past.
/// - `401 Unauthorized`: missing or revoked session token.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskInput>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    // Validate input
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), auth.user_id);

    // Insert task
    let created = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (id, title, description, status, priority, due_date, owner_id, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task.id)
    .bind(task.title)
    .bind(task.description)
    .bind(task.status)
    .bind(task.priority)
    .bind(task.due_date)
    .bind(task.owner_id)
    .bind(task.created_at)
    .bind(task.updated_at)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(json!({ "task": created })))
}

/// Retrieves a single task by its ID.
///
/// The lookup is scoped to the authenticated owner, so a task belonging to
/// someone else is indistinguishable from one that does not exist.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = $1 AND owner_id = $2",
        TASK_COLUMNS
    ))
    .bind(task_id.into_inner())
    .bind(auth.user_id)
    .fetch_optional(&**pool)
    .await?;

    match task {
        Some(task) => Ok(HttpResponse::Ok().json(json!({ "task": task }))),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Applies a partial update to a task owned by the authenticated user.
///
/// Absent fields keep their stored values inside a single UPDATE statement,
/// so two concurrent patches to different fields of one task both land. The
/// owner and creation date can never change; `updated_at` is bumped on
/// every successful update.
///
/// ## Responses:
/// - `200 OK`: the updated `Task` object.
/// - `400 Bad Request`: a present field fails validation.
/// - `404 Not Found`: no such task for this owner.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let update = task_data.into_inner();

    // Absent fields coalesce to the stored column value
    let updated = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks
         SET title = COALESCE($1, title),
             description = COALESCE($2, description),
             status = COALESCE($3, status),
             priority = COALESCE($4, priority),
             due_date = COALESCE($5, due_date),
             updated_at = $6
         WHERE id = $7 AND owner_id = $8
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(update.title)
    .bind(update.description)
    .bind(update.status)
    .bind(update.priority)
    .bind(update.due_date)
    .bind(Utc::now())
    .bind(task_id.into_inner())
    .bind(auth.user_id)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({ "task": updated })))
}

/// Deletes a task owned by the authenticated user.
///
/// ## Responses:
/// - `200 OK`: confirmation message.
/// - `404 Not Found`: no such task for this owner.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
        .bind(task_id.into_inner())
        .bind(auth.user_id)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}

/// Returns per-status task counts for the authenticated user.
///
/// A single aggregate query, so the numbers are consistent with each other
/// even while other requests are writing.
#[get("/stats/overview")]
pub async fn task_stats(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let stats = sqlx::query_as::<_, TaskStats>(
        "SELECT COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'in-progress') AS in_progress,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed
         FROM tasks WHERE owner_id = $1",
    )
    .bind(auth.user_id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "stats": stats })))
}
