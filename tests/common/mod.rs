#![allow(dead_code)]

use actix_web::{http::header, test};
use crudforge::auth::JwtKeys;
use crudforge::db::Repositories;
use crudforge::Services;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Services over a fresh in-memory store. bcrypt runs at its minimum cost.
pub fn services() -> Services {
    Services::new(
        Repositories::in_memory(),
        JwtKeys::from_secret(TEST_SECRET, 1),
        4,
    )
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Registers an account and logs in, returning the bearer token.
pub async fn register_and_login<S, B>(
    app: &S,
    name: &str,
    email: &str,
    password: &str,
) -> Result<String, String>
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({ "name": name, "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    if !status.is_success() {
        return Err(format!(
            "Failed to register user. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    if !status.is_success() {
        return Err(format!(
            "Failed to log in. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }

    let login: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| format!("Failed to parse login response: {}", e))?;
    login["token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| "login response has no token".to_string())
}
