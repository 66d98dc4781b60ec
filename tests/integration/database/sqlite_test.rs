//! SQLite-backed application tests
//!
//! Builds the app through `create_app` with a database file, so the store
//! selection, migrations and persistence across restarts are exercised.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use sharelist::backend::{create_app, ServerConfig};

use crate::common::{add_item, bearer, create_list, invite, login, test_config};

async fn sqlite_server(dir: &tempfile::TempDir) -> TestServer {
    let config = ServerConfig {
        database_url: Some(format!("sqlite://{}", dir.path().join("lists.db").display())),
        ..test_config()
    };
    TestServer::new(create_app(&config).await).expect("Failed to create test server")
}

#[tokio::test]
async fn test_lists_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let server = sqlite_server(&dir).await;
        let alice = login(&server, "alice").await;
        login(&server, "bob").await;
        create_list(&server, &alice, "groceries").await;
        add_item(&server, &alice, "groceries", "Bread").await;
        add_item(&server, &alice, "groceries", "Milk").await;
        invite(&server, &alice, "groceries", "bob").await;
    }

    let server = sqlite_server(&dir).await;
    let bob = login(&server, "bob").await;

    let (key, value) = bearer(&bob);
    let response = server.get("/shoppingList/groceries").add_header(key, value).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let list = response.json::<Value>();
    assert_eq!(list["owner"], "alice");
    assert_eq!(list["members"], json!(["alice", "bob"]));
    assert_eq!(
        list["items"],
        json!([
            { "name": "Bread", "checked": false },
            { "name": "Milk", "checked": false }
        ])
    );
}

#[tokio::test]
async fn test_sessions_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    let token = {
        let server = sqlite_server(&dir).await;
        login(&server, "alice").await
    };

    let server = sqlite_server(&dir).await;
    let (key, value) = bearer(&token);
    let response = server.get("/shoppingList").add_header(key, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_password_checked_against_stored_hash() {
    let dir = tempfile::tempdir().unwrap();

    {
        let server = sqlite_server(&dir).await;
        login(&server, "alice").await;
    }

    let server = sqlite_server(&dir).await;
    let response = server
        .post("/login")
        .json(&json!({ "username": "alice", "password": "guess" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rename_then_reuse_old_name() {
    let dir = tempfile::tempdir().unwrap();
    let server = sqlite_server(&dir).await;
    let alice = login(&server, "alice").await;
    create_list(&server, &alice, "groceries").await;

    let (key, value) = bearer(&alice);
    let response = server
        .put("/shoppingList/groceries")
        .add_header(key, value)
        .json(&json!({ "name": "weekly" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    create_list(&server, &alice, "groceries").await;

    let (key, value) = bearer(&alice);
    let all = server.get("/shoppingList").add_header(key, value).await;
    let names: Vec<String> = all
        .json::<Vec<Value>>()
        .iter()
        .map(|l| l["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["weekly", "groceries"]);
}
