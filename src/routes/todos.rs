use crate::{
    error::AppError,
    models::{CreateTodoInput, ListQuery, UpdateTodoInput},
    services::TodoService,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use uuid::Uuid;

/// Lists todos, oldest first.
///
/// ## Query Parameters:
/// - `done` (optional): only todos with this completion state.
/// - `limit` (optional, 1..=100) and `offset` (optional): pagination.
#[get("")]
pub async fn list_todos(
    service: web::Data<TodoService>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let todos = service.list(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Creates a todo from `{title, description}`.
///
/// ## Responses:
/// - `201 Created`: the new todo, with a generated `id` and `done: false`.
/// - `400 Bad Request`: malformed JSON or missing `title`.
/// - `422 Unprocessable Entity`: `title` empty or too long.
#[post("")]
pub async fn create_todo(
    service: web::Data<TodoService>,
    input: web::Json<CreateTodoInput>,
) -> Result<impl Responder, AppError> {
    let todo = service.create(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(todo))
}

#[get("/{id}")]
pub async fn get_todo(
    service: web::Data<TodoService>,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let todo = service.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Partially updates a todo. Fields left out of the body keep their value.
#[patch("/{id}")]
pub async fn update_todo(
    service: web::Data<TodoService>,
    id: web::Path<Uuid>,
    patch: web::Json<UpdateTodoInput>,
) -> Result<impl Responder, AppError> {
    let todo = service.update(id.into_inner(), patch.into_inner()).await?;
    Ok(HttpResponse::Ok().json(todo))
}

#[delete("/{id}")]
pub async fn delete_todo(
    service: web::Data<TodoService>,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    service.delete(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
