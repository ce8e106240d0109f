use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{TaskInput, TaskPatch, TaskQuery},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

/// Retrieves the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `status` (optional): `todo`, `in-progress` or `done`.
/// - `priority` (optional): `low`, `medium` or `high`.
/// - `search` (optional): words that must all appear in the title or description
///   (case-insensitive).
///
/// Tasks come back oldest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `400 Bad Request`: an unknown `status`/`priority` value.
/// - `401 Unauthorized`.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list(user_id.0, &query_params).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: required, non-blank, at most 200 characters.
/// - `description` (optional): at most 1000 characters.
/// - `status` (optional): defaults to `todo`.
/// - `priority` (optional): defaults to `medium`.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: validation failure.
/// - `401 Unauthorized`.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.create(user_id.0, task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one task. Tasks of other users are reported as `404`.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.get(user_id.0, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task.
///
/// Any subset of `title`, `description`, `status` and `priority` may be sent;
/// absent fields keep their value and `description: ""` clears it.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: validation failure.
/// - `401 Unauthorized`.
/// - `404 Not Found`: no such task, or not owned by the authenticated user.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
    patch: web::Json<TaskPatch>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .update(user_id.0, task_id.into_inner(), patch.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `204 No Content`: on successful deletion.
/// - `401 Unauthorized`.
/// - `404 Not Found`: no such task (including one already deleted), or not
///   owned by the authenticated user.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state.tasks.delete(user_id.0, task_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
