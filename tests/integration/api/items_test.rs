//! Item API tests
//!
//! Tests for adding, reading, renaming, marking and removing items.

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::{add_item, bearer, create_list, invite, login, test_server};

#[tokio::test]
async fn test_add_item_trims_name() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    create_list(&server, &alice, "groceries").await;

    let item = add_item(&server, &alice, "groceries", "  Bread  ").await;

    assert_eq!(item, json!({ "name": "Bread", "checked": false }));
}

#[tokio::test]
async fn test_add_duplicate_item() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    create_list(&server, &alice, "groceries").await;
    add_item(&server, &alice, "groceries", "Bread").await;

    let (key, value) = bearer(&alice);
    let response = server
        .post("/shoppingList/groceries/item")
        .add_header(key, value)
        .json(&json!({ "name": "Bread " }))
        .await;

    crate::assert_rejected!(response, StatusCode::BAD_REQUEST, "Item already exists");
}

#[tokio::test]
async fn test_add_item_validation() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    create_list(&server, &alice, "groceries").await;

    let (key, value) = bearer(&alice);
    let response = server
        .post("/shoppingList/groceries/item")
        .add_header(key, value)
        .json(&json!({ "name": "x".repeat(129) }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"],
        json!(["body.name: name is too long (max 128 chars)"])
    );

    let (key, value) = bearer(&alice);
    let response = server
        .post("/shoppingList/groceries/item")
        .add_header(key, value)
        .json(&json!(["Bread"]))
        .await;
    crate::assert_rejected!(
        response,
        StatusCode::BAD_REQUEST,
        "Request body must be a JSON object"
    );
}

#[tokio::test]
async fn test_items_keep_insertion_order() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    create_list(&server, &alice, "groceries").await;
    for name in ["Bread", "Milk", "Eggs"] {
        add_item(&server, &alice, "groceries", name).await;
    }

    let (key, value) = bearer(&alice);
    server
        .put("/shoppingList/groceries/item/Milk")
        .add_header(key, value)
        .json(&json!({ "name": "Oat milk" }))
        .await;

    let (key, value) = bearer(&alice);
    let response = server.get("/shoppingList/groceries/items").add_header(key, value).await;
    let names: Vec<String> = response
        .json::<Vec<Value>>()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(names, vec!["Bread", "Oat milk", "Eggs"]);
}

#[tokio::test]
async fn test_get_item() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    create_list(&server, &alice, "groceries").await;
    add_item(&server, &alice, "groceries", "Bread").await;

    let (key, value) = bearer(&alice);
    let found = server
        .get("/shoppingList/groceries/item/Bread")
        .add_header(key, value)
        .await;
    assert_eq!(found.status_code(), StatusCode::OK);
    assert_eq!(found.json::<Value>()["name"], "Bread");

    let (key, value) = bearer(&alice);
    let missing = server
        .get("/shoppingList/groceries/item/Cheese")
        .add_header(key, value)
        .await;
    crate::assert_rejected!(missing, StatusCode::NOT_FOUND, "Item not found");
}

#[tokio::test]
async fn test_rename_item_collision() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    create_list(&server, &alice, "groceries").await;
    add_item(&server, &alice, "groceries", "Bread").await;
    add_item(&server, &alice, "groceries", "Milk").await;

    let (key, value) = bearer(&alice);
    let response = server
        .put("/shoppingList/groceries/item/Bread")
        .add_header(key, value)
        .json(&json!({ "name": "Milk" }))
        .await;

    crate::assert_rejected!(response, StatusCode::BAD_REQUEST, "Item already exists");
}

#[tokio::test]
async fn test_mark_item_explicit_and_toggle() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    create_list(&server, &alice, "groceries").await;
    add_item(&server, &alice, "groceries", "Bread").await;

    let mark = |body: Value| {
        let (key, value) = bearer(&alice);
        server
            .put("/shoppingList/groceries/item/Bread/mark")
            .add_header(key, value)
            .json(&body)
    };

    let response = mark(json!({ "checked": true })).await;
    assert_eq!(response.json::<Value>()["checked"], true);

    let response = mark(json!({ "checked": true })).await;
    assert_eq!(response.json::<Value>()["checked"], true);

    let response = mark(json!({ "checked": null })).await;
    assert_eq!(response.json::<Value>()["checked"], false);

    let response = mark(json!({})).await;
    assert_eq!(response.json::<Value>()["checked"], true);

    let response = mark(json!({ "checked": "false" })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_member_edits_items_outsider_cannot() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    let bob = login(&server, "bob").await;
    let carol = login(&server, "carol").await;
    create_list(&server, &alice, "groceries").await;
    invite(&server, &alice, "groceries", "bob").await;

    add_item(&server, &bob, "groceries", "Bread").await;

    let (key, value) = bearer(&carol);
    let response = server
        .post("/shoppingList/groceries/item")
        .add_header(key, value)
        .json(&json!({ "name": "Milk" }))
        .await;
    crate::assert_rejected!(
        response,
        StatusCode::FORBIDDEN,
        "You are not a member of this shopping list"
    );
}

#[tokio::test]
async fn test_delete_item() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    create_list(&server, &alice, "groceries").await;
    add_item(&server, &alice, "groceries", "Bread").await;

    let (key, value) = bearer(&alice);
    let response = server
        .delete("/shoppingList/groceries/item/Bread")
        .add_header(key, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let (key, value) = bearer(&alice);
    let response = server
        .delete("/shoppingList/groceries/item/Bread")
        .add_header(key, value)
        .await;
    crate::assert_rejected!(response, StatusCode::NOT_FOUND, "Item not found");
}

#[tokio::test]
async fn test_archived_list_is_read_only_for_items() {
    let server = test_server();
    let alice = login(&server, "alice").await;
    create_list(&server, &alice, "groceries").await;
    add_item(&server, &alice, "groceries", "Bread").await;

    let (key, value) = bearer(&alice);
    server
        .put("/shoppingList/groceries")
        .add_header(key, value)
        .json(&json!({ "archived": true }))
        .await;

    let (key, value) = bearer(&alice);
    let response = server
        .put("/shoppingList/groceries/item/Bread/mark")
        .add_header(key, value)
        .await;
    crate::assert_rejected!(
        response,
        StatusCode::BAD_REQUEST,
        "Shopping list is archived and cannot be modified"
    );

    let (key, value) = bearer(&alice);
    let response = server
        .delete("/shoppingList/groceries/item/Bread")
        .add_header(key, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let (key, value) = bearer(&alice);
    let items = server.get("/shoppingList/groceries/items").add_header(key, value).await;
    assert_eq!(items.status_code(), StatusCode::OK);
    assert_eq!(items.json::<Value>(), json!([{ "name": "Bread", "checked": false }]));
}
