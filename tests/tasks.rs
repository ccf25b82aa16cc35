mod common;

use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, App, HttpServer};
use crudforge::models::Task;
use crudforge::routes;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

#[actix_rt::test]
async fn test_task_crud_flow() {
    let app = test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(routes::app(common::services())),
    )
    .await;

    let token = common::register_and_login(&app, "Ada", "ada@example.com", "Password123!")
        .await
        .expect("Setup failed: user");

    // 1. Create Task
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(common::bearer(&token))
        .set_json(json!({ "title": "Write report", "description": "Quarterly numbers" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Task = test::read_body_json(resp).await;
    assert_eq!(created.title, "Write report");
    assert!(!created.done);

    // 2. Get Task
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(common::bearer(&token))
        .to_request();
    let fetched: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    // 3. Update Task (title only)
    let req = test::TestRequest::patch()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(common::bearer(&token))
        .set_json(json!({ "title": "Write final report" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Task = test::read_body_json(resp).await;
    assert_eq!(updated.title, "Write final report");
    assert_eq!(updated.description, "Quarterly numbers");
    assert_eq!(updated.user_id, created.user_id);
    assert!(updated.updated_at >= created.updated_at);

    // 4. Delete Task
    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Task not found" }));
}

#[actix_rt::test]
async fn test_tasks_are_scoped_to_their_owner() {
    let app = test::init_service(App::new().configure(routes::app(common::services()))).await;

    let owner = common::register_and_login(&app, "Owner", "owner@example.com", "Password123!")
        .await
        .expect("Setup failed: owner");
    let other = common::register_and_login(&app, "Other", "other@example.com", "Password123!")
        .await
        .expect("Setup failed: other");

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(common::bearer(&owner))
        .set_json(json!({ "title": "Private task" }))
        .to_request();
    let task: Task = test::call_and_read_body_json(&app, req).await;

    // The other user's list is empty, the owner's has the task
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(common::bearer(&other))
        .to_request();
    let others: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert!(others.is_empty());

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(common::bearer(&owner))
        .to_request();
    let owned: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(owned, vec![task.clone()]);

    // Every per-id operation by a non-owner is forbidden
    let uri = format!("/api/tasks/{}", task.id);
    let test_cases = vec![
        (test::TestRequest::get().uri(&uri), "get"),
        (
            test::TestRequest::patch()
                .uri(&uri)
                .set_json(json!({ "done": true })),
            "update",
        ),
        (test::TestRequest::delete().uri(&uri), "delete"),
    ];
    for (request, description) in test_cases {
        let req = request.insert_header(common::bearer(&other)).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            status,
            StatusCode::FORBIDDEN,
            "Test case failed: {}. Body: {}",
            description,
            body
        );
        assert_eq!(body, json!({ "error": "You do not have access to this task" }));
    }

    // Still intact for the owner
    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(common::bearer(&owner))
        .to_request();
    let unchanged: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unchanged, task);
}

#[actix_rt::test]
async fn test_task_requests_without_valid_token() {
    let app = test::init_service(App::new().configure(routes::app(common::services()))).await;

    let test_cases = vec![
        (test::TestRequest::get().uri("/api/tasks"), "no header"),
        (
            test::TestRequest::get()
                .uri("/api/tasks")
                .insert_header(("Authorization", "Basic dXNlcjpwYXNz")),
            "wrong scheme",
        ),
        (
            test::TestRequest::get()
                .uri("/api/tasks")
                .insert_header(common::bearer("not.a.jwt")),
            "garbage token",
        ),
        (
            test::TestRequest::get()
                .uri(&format!("/api/tasks/{}", Uuid::new_v4()))
                .insert_header(common::bearer(
                    &crudforge::auth::JwtKeys::from_secret(b"some-other-secret", 1)
                        .issue(Uuid::new_v4(), &["user"])
                        .unwrap(),
                )),
            "token signed with another key",
        ),
        (
            test::TestRequest::post()
                .uri("/api/tasks")
                .set_json(json!({ "title": "Sneaky" })),
            "create without header",
        ),
    ];

    for (request, description) in test_cases {
        let resp = test::call_service(&app, request.to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            status,
            StatusCode::UNAUTHORIZED,
            "Test case failed: {}. Body: {}",
            description,
            body
        );
        assert!(body["error"].is_string(), "{}: {}", description, body);
    }
}

#[actix_rt::test]
async fn test_task_validation() {
    let app = test::init_service(App::new().configure(routes::app(common::services()))).await;
    let token = common::register_and_login(&app, "Val", "val@example.com", "Password123!")
        .await
        .expect("Setup failed: user");

    let test_cases = vec![
        (json!({ "title": "" }), StatusCode::UNPROCESSABLE_ENTITY, "empty title"),
        (
            json!({ "title": "x".repeat(201) }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "title too long",
        ),
        (json!({ "title": 42 }), StatusCode::BAD_REQUEST, "title not a string"),
        (json!({}), StatusCode::BAD_REQUEST, "missing title"),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .insert_header(common::bearer(&token))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            expected_status,
            "Test case failed: {}",
            description
        );
    }

    let req = test::TestRequest::get()
        .uri("/api/tasks/123")
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_create_task_unauthorized_over_http() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let services = common::services();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .wrap(Logger::default())
            .configure(routes::app(services.clone()))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let handle = server.handle();
    actix_rt::spawn(server);

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/api/tasks", port))
        .json(&json!({ "title": "Unauthorized Task" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = resp.json().await.expect("error body is JSON");
    assert!(body["error"].is_string());

    handle.stop(true).await;
}
