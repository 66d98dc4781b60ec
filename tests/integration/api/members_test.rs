//! Membership API tests
//!
//! Tests for inviting, listing and removing members under both owner
//! removal policies.

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::{bearer, create_list, invite, login, reassigning_server, test_server};

#[tokio::test]
async fn test_invite_is_idempotent() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    login(&server, "bob").await;
    create_list(&server, &alice, "groceries").await;

    invite(&server, &alice, "groceries", "bob").await;
    let members = invite(&server, &alice, "groceries", " bob ").await;

    assert_eq!(members["members"], json!(["alice", "bob"]));
}

#[tokio::test]
async fn test_invite_unknown_user() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    create_list(&server, &alice, "groceries").await;

    let (key, value) = bearer(&alice);
    let response = server
        .post("/shoppingList/groceries/invite")
        .add_header(key, value)
        .json(&json!({ "name": "nobody" }))
        .await;

    crate::assert_rejected!(response, StatusCode::NOT_FOUND, "User not found");
}

#[tokio::test]
async fn test_only_owner_invites() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    let bob = login(&server, "bob").await;
    login(&server, "carol").await;
    create_list(&server, &alice, "groceries").await;
    invite(&server, &alice, "groceries", "bob").await;

    let (key, value) = bearer(&bob);
    let response = server
        .post("/shoppingList/groceries/invite")
        .add_header(key, value)
        .json(&json!({ "name": "carol" }))
        .await;

    crate::assert_rejected!(response, StatusCode::FORBIDDEN, "Only the owner can manage members");
}

#[tokio::test]
async fn test_get_members() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    let bob = login(&server, "bob").await;
    create_list(&server, &alice, "groceries").await;
    invite(&server, &alice, "groceries", "bob").await;

    let (key, value) = bearer(&bob);
    let response = server
        .get("/shoppingList/groceries/members")
        .add_header(key, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!(["alice", "bob"]));
}

#[tokio::test]
async fn test_member_leaves_and_loses_access() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    let bob = login(&server, "bob").await;
    create_list(&server, &alice, "groceries").await;
    invite(&server, &alice, "groceries", "bob").await;

    let (key, value) = bearer(&bob);
    let response = server
        .delete("/shoppingList/groceries/remove")
        .add_header(key, value)
        .json(&json!({ "name": "bob" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "members": ["alice"], "owner": "alice" })
    );

    let (key, value) = bearer(&bob);
    let response = server.get("/shoppingList/groceries").add_header(key, value).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_member_cannot_remove_others() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    let bob = login(&server, "bob").await;
    login(&server, "carol").await;
    create_list(&server, &alice, "groceries").await;
    invite(&server, &alice, "groceries", "bob").await;
    invite(&server, &alice, "groceries", "carol").await;

    let (key, value) = bearer(&bob);
    let response = server
        .delete("/shoppingList/groceries/remove")
        .add_header(key, value)
        .json(&json!({ "name": "carol" }))
        .await;

    crate::assert_rejected!(
        response,
        StatusCode::FORBIDDEN,
        "Only the owner can remove other members"
    );
}

#[tokio::test]
async fn test_owner_removes_member() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    login(&server, "bob").await;
    create_list(&server, &alice, "groceries").await;
    invite(&server, &alice, "groceries", "bob").await;

    let (key, value) = bearer(&alice);
    let response = server
        .delete("/shoppingList/groceries/remove")
        .add_header(key, value)
        .json(&json!({ "name": "bob" }))
        .await;
    assert_eq!(response.json::<Value>()["members"], json!(["alice"]));

    let (key, value) = bearer(&alice);
    let response = server
        .delete("/shoppingList/groceries/remove")
        .add_header(key, value)
        .json(&json!({ "name": "bob" }))
        .await;
    crate::assert_rejected!(
        response,
        StatusCode::NOT_FOUND,
        "Member not found in the shopping list"
    );
}

#[tokio::test]
async fn test_owner_leaves_under_reassign() {
    let server = reassigning_server();
    let alice = login(&server, "alice").await;
    let bob = login(&server, "bob").await;
    create_list(&server, &alice, "groceries").await;
    invite(&server, &alice, "groceries", "bob").await;

    let (key, value) = bearer(&alice);
    let response = server
        .delete("/shoppingList/groceries/remove")
        .add_header(key, value)
        .json(&json!({ "name": "alice" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "members": ["bob"], "owner": "bob" })
    );

    let (key, value) = bearer(&bob);
    let response = server.delete("/shoppingList/groceries").add_header(key, value).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_last_owner_leaves_under_reassign() {
    let server = reassigning_server();
    let alice = login(&server, "alice").await;
    create_list(&server, &alice, "solo").await;

    let (key, value) = bearer(&alice);
    let response = server
        .delete("/shoppingList/solo/remove")
        .add_header(key, value)
        .json(&json!({ "name": "alice" }))
        .await;

    assert_eq!(
        response.json::<Value>(),
        json!({ "members": [], "owner": null })
    );
}
