use crate::{auth::LoginRequest, error::AppError, services::AuthService};
use actix_web::{post, web, HttpResponse, Responder};

/// Login user
///
/// Authenticates a user and returns `{"token": "..."}`. Unknown emails and wrong
/// passwords both answer `401` with `Invalid credentials`.
#[post("/login")]
pub async fn login(
    service: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = service.login(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
