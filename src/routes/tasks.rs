use crate::{
    auth::{owns, AuthenticatedUser},
    error::AppError,
    models::{Task, TaskInput, TaskPage, TaskQuery, TaskUpdate},
    state::AppState,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use log::{info, warn};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

const NOT_AUTHORIZED: &str = "Not authorized";

/// Path of the collection routes: `/{user_id}/tasks`.
#[derive(Debug, Deserialize)]
pub struct UserPath {
    pub user_id: String,
}

/// Path of the item routes: `/{user_id}/tasks/{task_id}`.
///
/// `task_id` stays a string until the path owner has been checked, so a
/// malformed id under someone else's path is still `403`.
#[derive(Debug, Deserialize)]
pub struct TaskPath {
    pub user_id: String,
    pub task_id: String,
}

/// Turns a failed ownership check into `403`.
fn require_owner(user: &AuthenticatedUser, resource_owner: &str) -> Result<(), AppError> {
    if owns(user.identity.as_str(), resource_owner) {
        Ok(())
    } else {
        warn!(
            "Account {} denied access to resources of {}",
            user.identity, resource_owner
        );
        Err(AppError::Forbidden(NOT_AUTHORIZED.into()))
    }
}

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Loads a task and checks that the caller owns it. An id that is not a UUID
/// cannot name a task.
async fn owned_task(
    state: &AppState,
    user: &AuthenticatedUser,
    task_id: &str,
) -> Result<Task, AppError> {
    let task_id = Uuid::parse_str(task_id).map_err(|_| task_not_found())?;
    let task = state
        .tasks
        .find(task_id)
        .await?
        .ok_or_else(task_not_found)?;
    require_owner(user, &task.user_id.hyphenated().to_string())?;
    Ok(task)
}

/// Lists the caller's tasks.
///
/// ## Query Parameters:
/// - `skip` (optional, default 0): number of tasks to skip.
/// - `limit` (optional, default 100, max 100): page size.
/// - `status` (optional): `pending`, `in_progress` or `completed`.
///
/// ## Responses:
/// - `200 OK`: `{"tasks": [...], "pagination": {...}}`, newest first.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: `user_id` is not the caller.
/// - `422 Unprocessable Entity`: pagination out of range.
#[get("")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    path: web::Path<UserPath>,
    query: web::Query<TaskQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    require_owner(&user, &path.user_id)?;
    query.validate()?;

    let query = query.into_inner();
    let tasks = state.tasks.list_for_user(user.user_id, &query).await?;
    let total = state.tasks.count_for_user(user.user_id, query.status).await?;

    Ok(HttpResponse::Ok().json(TaskPage::new(tasks, total, &query)))
}

/// Creates a task owned by the caller.
///
/// ## Responses:
/// - `201 Created`: the stored task.
/// - `401 Unauthorized` / `403 Forbidden` as for every task route.
/// - `422 Unprocessable Entity`: title or description out of bounds.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    path: web::Path<UserPath>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    require_owner(&user, &path.user_id)?;
    task_data.validate()?;

    let task = state
        .tasks
        .create(Task::new(task_data.into_inner(), user.user_id))
        .await?;

    info!("Account {} created task {}", user.identity, task.id);
    Ok(HttpResponse::Created().json(task))
}

/// Fetches a single task.
///
/// ## Responses:
/// - `200 OK`: the task.
/// - `403 Forbidden`: the task or the path belongs to someone else.
/// - `404 Not Found`: no task with that id.
#[get("/{task_id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    path: web::Path<TaskPath>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    require_owner(&user, &path.user_id)?;
    let task = owned_task(&state, &user, &path.task_id).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Updates the fields present in the body; the rest are left alone.
#[put("/{task_id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    path: web::Path<TaskPath>,
    task_data: web::Json<TaskUpdate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    require_owner(&user, &path.user_id)?;
    task_data.validate()?;

    let mut task = owned_task(&state, &user, &path.task_id).await?;
    task.apply(task_data.into_inner());
    let updated = state.tasks.update(&task).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a task.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `403 Forbidden` / `404 Not Found` as for `get_task`.
#[delete("/{task_id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    path: web::Path<TaskPath>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    require_owner(&user, &path.user_id)?;
    let task = owned_task(&state, &user, &path.task_id).await?;

    if !state.tasks.delete(task.id).await? {
        return Err(task_not_found());
    }

    info!("Account {} deleted task {}", user.identity, task.id);
    Ok(HttpResponse::NoContent().finish())
}

/// Flips the `completed` flag of a task.
#[patch("/{task_id}/complete")]
pub async fn toggle_task_completion(
    state: web::Data<AppState>,
    path: web::Path<TaskPath>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    require_owner(&user, &path.user_id)?;

    let mut task = owned_task(&state, &user, &path.task_id).await?;
    task.toggle_completion();
    let updated = state.tasks.update(&task).await?;

    Ok(HttpResponse::Ok().json(updated))
}
