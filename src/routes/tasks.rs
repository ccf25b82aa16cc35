use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CreateTaskInput, ListQuery, UpdateTaskInput},
    services::TaskService,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use uuid::Uuid;

/// Retrieves the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `done` (optional): filter by completion state.
/// - `limit` (optional, 1..=100) and `offset` (optional): pagination.
///
/// ## Responses:
/// - `200 OK`: JSON array of the caller's tasks, oldest first.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[get("")]
pub async fn get_tasks(
    service: web::Data<TaskService>,
    user: AuthenticatedUser,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let tasks = service.list(user.id, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: required, 1 to 200 characters.
/// - `description` (optional): up to 1000 characters.
///
/// ## Responses:
/// - `201 Created`: the new task.
/// - `400 Bad Request`: malformed JSON.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `422 Unprocessable Entity`: validation failure.
#[post("")]
pub async fn create_task(
    service: web::Data<TaskService>,
    user: AuthenticatedUser,
    input: web::Json<CreateTaskInput>,
) -> Result<impl Responder, AppError> {
    let task = service.create(user.id, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one task.
///
/// ## Responses:
/// - `200 OK`: the task.
/// - `403 Forbidden`: the task belongs to another user.
/// - `404 Not Found`: no task with this id.
#[get("/{id}")]
pub async fn get_task(
    service: web::Data<TaskService>,
    user: AuthenticatedUser,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = service.get(user.id, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task the caller owns.
#[patch("/{id}")]
pub async fn update_task(
    service: web::Data<TaskService>,
    user: AuthenticatedUser,
    id: web::Path<Uuid>,
    patch: web::Json<UpdateTaskInput>,
) -> Result<impl Responder, AppError> {
    let task = service
        .update(user.id, id.into_inner(), patch.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task the caller owns. `204 No Content` on success.
#[delete("/{id}")]
pub async fn delete_task(
    service: web::Data<TaskService>,
    user: AuthenticatedUser,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    service.delete(user.id, id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
