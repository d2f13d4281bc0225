//! Common test utilities for mediashelf integration tests
//!
//! Each test app gets its own shared-memory SQLite database, so tests run
//! in parallel without seeing each other's rows.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use mediashelf::{auth::AuthSettings, create_app, db::init_pool, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Creates a test application backed by a fresh database
pub fn create_test_app() -> Router {
    let url = format!("file:it_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = init_pool(&url).expect("Failed to create pool");
    {
        let mut conn = pool.get().expect("Failed to get connection");
        mediashelf::run_migrations(&mut conn).expect("Failed to run migrations");
    }

    // Lowest bcrypt cost keeps registration fast
    let auth = AuthSettings::new(
        "integration-test-secret".to_string(),
        Duration::from_secs(3600),
        4,
    );
    create_app(AppState::new(Arc::new(pool), Arc::new(auth)))
}

/// Sends a request and returns the status and JSON body
///
/// Empty bodies come back as `Value::Null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Registers an account and returns its session token
pub async fn register(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "name": name, "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

/// Creates tags through the API and returns them
pub async fn create_tags(app: &Router, token: &str, names: &[&str]) -> Vec<Value> {
    let (status, body) = send(app, "POST", "/tags", Some(token), Some(json!({ "tags": names }))).await;
    assert_eq!(status, StatusCode::CREATED, "create tags failed: {}", body);
    body.as_array().unwrap().clone()
}

/// Creates types through the API and returns them
pub async fn create_types(app: &Router, token: &str, names: &[&str]) -> Vec<Value> {
    let (status, body) = send(app, "POST", "/types", Some(token), Some(json!({ "types": names }))).await;
    assert_eq!(status, StatusCode::CREATED, "create types failed: {}", body);
    body.as_array().unwrap().clone()
}

/// Finds the id of the named entry in a list of tags or types
pub fn id_of(entries: &[Value], name: &str) -> String {
    entries
        .iter()
        .find(|entry| entry["name"] == name)
        .and_then(|entry| entry["id"].as_str())
        .unwrap_or_else(|| panic!("no entry named {}", name))
        .to_string()
}

/// Creates a listing through the API and returns it
pub async fn create_listing(
    app: &Router,
    token: &str,
    name: &str,
    type_id: &str,
    tag_ids: &[String],
) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/listings",
        Some(token),
        Some(json!({ "name": name, "type_id": type_id, "tags": tag_ids })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create listing failed: {}", body);
    body
}
