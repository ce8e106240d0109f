#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Duration;
use serde_json::{json, Value};

use workpilot::auth::{AuthResponse, PasswordHasher, TokenService};
use workpilot::state::AppState;
use workpilot::store::MemoryStore;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "secret123";

/// State over a fresh in-memory store. bcrypt runs at its minimum cost.
pub fn test_state() -> AppState {
    let store = Arc::new(MemoryStore::new());
    AppState::new(
        store.clone(),
        store,
        TokenService::new(TEST_SECRET, Duration::days(30)),
        PasswordHasher::new(4),
    )
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Sends `req` and returns the status with the parsed JSON body (`Null` when
/// the body is empty). Errors raised by middleware are rendered the way the
/// server would render them.
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: actix_http::Request,
) -> (StatusCode, Value) {
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
    }
}

pub async fn register_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
) -> AuthResponse {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&json!({ "name": name, "email": email, "password": PASSWORD }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "Registration failed. Body: {}", body);
    serde_json::from_value(body).expect("Failed to parse registration response")
}

pub async fn create_task(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    token: &str,
    payload: Value,
) -> Value {
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(token))
        .set_json(&payload)
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "Create task failed. Body: {}", body);
    body
}
