use crate::{
    auth::{AuthMiddleware, AuthenticatedUser},
    error::AppError,
    models::{RegisterRequest, UserResponse},
    services::UserService,
};
use actix_web::{get, post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates an account from `{name, email, password}` and returns the public
/// user record. A taken email is `409 Conflict`.
#[post("/register")]
pub async fn register(
    service: web::Data<UserService>,
    request: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = service.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// The account behind the bearer token.
#[get("/me", wrap = "AuthMiddleware")]
pub async fn me(
    service: web::Data<UserService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = service.get(user.id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
