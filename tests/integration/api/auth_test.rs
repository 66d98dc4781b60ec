//! Authentication API tests
//!
//! Tests for login (with implicit registration), logout and the bearer
//! credential on protected routes.

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::{bearer, login, test_server};

#[tokio::test]
async fn test_login_registers_unknown_user() {
    let server = test_server();

    let response = server
        .post("/login")
        .json(&json!({ "username": "alice", "password": "secret" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["token"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_login_trims_username() {
    let server = test_server();

    let response = server
        .post("/login")
        .json(&json!({ "username": "  alice ", "password": "secret" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["user"]["username"], "alice");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let server = test_server();
    login(&server, "alice").await;

    let response = server
        .post("/login")
        .json(&json!({ "username": "alice", "password": "not-alice" }))
        .await;

    crate::assert_rejected!(response, StatusCode::UNAUTHORIZED, "Wrong password");
}

#[tokio::test]
async fn test_each_login_issues_a_new_token() {
    let server = test_server();
    let first = login(&server, "alice").await;
    let second = login(&server, "alice").await;
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_login_missing_fields() {
    let server = test_server();

    let response = server.post("/login").json(&json!({})).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["message"], "Invalid input");
    let errors: Vec<String> = serde_json::from_value(body["errors"].clone()).unwrap();
    assert!(errors.contains(&"body.username: username is required".to_string()));
    assert!(errors.contains(&"body.password: password is required".to_string()));
}

#[tokio::test]
async fn test_password_is_taken_verbatim() {
    let server = test_server();

    let response = server
        .post("/login")
        .json(&json!({ "username": "alice", "password": "   " }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .post("/login")
        .json(&json!({ "username": "alice", "password": "" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post("/login")
        .json(&json!({ "username": "alice", "password": "  " }))
        .await;
    crate::assert_rejected!(response, StatusCode::UNAUTHORIZED, "Wrong password");
}

#[tokio::test]
async fn test_password_over_bcrypt_limit_is_rejected() {
    let server = test_server();

    let response = server
        .post("/login")
        .json(&json!({ "username": "alice", "password": "a".repeat(73) }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(
        body["errors"],
        json!(["body.password: password is too long (max 72 bytes)"])
    );
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let server = test_server();

    let response = server.get("/shoppingList").await;

    crate::assert_rejected!(response, StatusCode::UNAUTHORIZED, "Not authenticated");
}

#[tokio::test]
async fn test_protected_route_with_unknown_token() {
    let server = test_server();
    let (key, value) = bearer("0123456789abcdef");

    let response = server.get("/shoppingList").add_header(key, value).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unauthenticated_before_not_found() {
    let server = test_server();

    let response = server.get("/shoppingList/nowhere").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let server = test_server();
    let token = login(&server, "alice").await;

    let (key, value) = bearer(&token);
    let response = server.post("/logout").add_header(key, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["message"], "Logged out");

    let (key, value) = bearer(&token);
    let response = server.get("/shoppingList").add_header(key, value).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_keeps_other_sessions() {
    let server = test_server();
    let phone = login(&server, "alice").await;
    let laptop = login(&server, "alice").await;

    let (key, value) = bearer(&phone);
    server.post("/logout").add_header(key, value).await;

    let (key, value) = bearer(&laptop);
    let response = server.get("/shoppingList").add_header(key, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_and_fallback() {
    let server = test_server();

    let health = server.get("/").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(health.json::<Value>()["status"], "ok");

    let missing = server.get("/no/such/route").await;
    crate::assert_rejected!(missing, StatusCode::NOT_FOUND, "Not found");
}
