#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use feedbackd::api::AppState;
use feedbackd::config::Config;
use feedbackd::state::SharedState;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Config backed by a fresh temp-file database, with cheap hashing and
/// notifications switched off.
pub fn test_config(prefix: &str) -> Config {
    let db_path =
        std::env::temp_dir().join(format!("feedbackd-{prefix}-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.security.jwt_secret = "test-secret".to_string();
    config.bootstrap.admin_email = Some(ADMIN_EMAIL.to_string());
    config.bootstrap.admin_password = Some(ADMIN_PASSWORD.to_string());
    config.mail.enabled = false;
    config
}

pub async fn shared_state(config: Config) -> SharedState {
    SharedState::new(config)
        .await
        .expect("Failed to create shared state")
}

pub async fn spawn_app(prefix: &str) -> (Router, Arc<AppState>) {
    let shared = Arc::new(shared_state(test_config(prefix)).await);
    let state = feedbackd::api::create_app_state(shared, None);
    (feedbackd::api::router(state.clone()), state)
}

/// Sends one request and returns the status with the decoded JSON body
/// (`Null` when the body is empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Creates a reviewer through the admin endpoint and logs them in.
pub async fn reviewer_token(app: &Router, admin_token: &str, email: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/reviewers",
        Some(admin_token),
        Some(serde_json::json!({ "email": email, "password": "reviewer-password" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "reviewer creation failed: {body}");
    let id = body["data"]["id"].as_i64().unwrap();
    (id, login(app, email, "reviewer-password").await)
}
