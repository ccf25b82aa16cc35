pub mod auth;
pub mod health;
pub mod tasks;
pub mod todos;
pub mod users;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;
use crate::services::Services;

/// Extractor failures answer with the same `{"error": ...}` body as every other error.
fn extractor_errors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid path parameter: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query string: {}", err)).into()
    }));
}

/// Registers the `/api` routes. Mount with `web::scope("/api").configure(routes::config)`.
pub fn config(cfg: &mut web::ServiceConfig) {
    extractor_errors(cfg);
    cfg.service(
        web::scope("/todos")
            .service(todos::list_todos)
            .service(todos::create_todo)
            .service(todos::get_todo)
            .service(todos::update_todo)
            .service(todos::delete_todo),
    )
    .service(
        web::scope("/tasks")
            .wrap(AuthMiddleware)
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    )
    .service(
        web::scope("/users")
            .service(users::register)
            .service(users::me),
    )
    .service(web::scope("/auth").service(auth::login));
}

/// Registers the services as application data, `/health`, and the `/api` scope.
///
/// ```ignore
/// App::new().configure(routes::app(services.clone()))
/// ```
pub fn app(services: Services) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(services.auth.keys().clone()))
            .app_data(web::Data::new(services.todos))
            .app_data(web::Data::new(services.tasks))
            .app_data(web::Data::new(services.users))
            .app_data(web::Data::new(services.auth))
            .service(health::health)
            .service(web::scope("/api").configure(config))
            .default_service(web::to(not_found));
    }
}

async fn not_found() -> Result<actix_web::HttpResponse, AppError> {
    Err(AppError::NotFound("Route not found".into()))
}
