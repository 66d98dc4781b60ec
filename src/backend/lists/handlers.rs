/**
 * Shopping List Handlers
 *
 * Thin HTTP adapters over `ListEngine`. Each handler takes the principal
 * from `AuthUser`, the request fields from a `Validated` body or query,
 * calls exactly one engine operation and shapes the response.
 *
 * # Status Codes
 *
 * - `200` - read or update with a body
 * - `201` - list created, item added, member invited
 * - `204` - list or item deleted
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::backend::error::BackendResult;
use crate::backend::lists::engine::{ListEngine, ListUpdate, Membership};
use crate::backend::lists::validate::{
    CreateListRequest, ListQuery, MarkItemRequest, NameRequest, UpdateListRequest, Validated,
};
use crate::backend::middleware::AuthUser;
use crate::shared::{Item, ItemStats, Principal, ShoppingList};

/// `{ members }` body of an invite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembersResponse {
    pub members: Vec<Principal>,
}

// --------------------------------------------------------------------
// Lists
// --------------------------------------------------------------------

/// GET /shoppingList?archived=
pub async fn get_lists(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Validated(query): Validated<ListQuery>,
) -> BackendResult<Json<Vec<ShoppingList>>> {
    let lists = engine.list_lists(&user.principal, query.archived).await?;
    Ok(Json(lists))
}

/// POST /shoppingList/{list_name}
pub async fn create_list(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Path(list_name): Path<String>,
    Validated(_): Validated<CreateListRequest>,
) -> BackendResult<(StatusCode, Json<ShoppingList>)> {
    let list = engine.create_list(&list_name, &user.principal).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

/// GET /shoppingList/{list_name}
pub async fn get_list(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Path(list_name): Path<String>,
) -> BackendResult<Json<ShoppingList>> {
    Ok(Json(engine.get_list(&list_name, &user.principal).await?))
}

/// PUT /shoppingList/{list_name}
pub async fn update_list(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Path(list_name): Path<String>,
    Validated(request): Validated<UpdateListRequest>,
) -> BackendResult<Json<ShoppingList>> {
    let update = ListUpdate {
        name: request.name,
        archived: request.archived,
    };
    Ok(Json(engine.update_list(&list_name, update, &user.principal).await?))
}

/// DELETE /shoppingList/{list_name}
pub async fn delete_list(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Path(list_name): Path<String>,
) -> BackendResult<StatusCode> {
    engine.delete_list(&list_name, &user.principal).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /shoppingList/{list_name}/stats
pub async fn get_stats(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Path(list_name): Path<String>,
) -> BackendResult<Json<ItemStats>> {
    Ok(Json(engine.item_stats(&list_name, &user.principal).await?))
}

// --------------------------------------------------------------------
// Items
// --------------------------------------------------------------------

/// GET /shoppingList/{list_name}/items
pub async fn get_items(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Path(list_name): Path<String>,
) -> BackendResult<Json<Vec<Item>>> {
    Ok(Json(engine.list_items(&list_name, &user.principal).await?))
}

/// POST /shoppingList/{list_name}/item
pub async fn create_item(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Path(list_name): Path<String>,
    Validated(request): Validated<NameRequest>,
) -> BackendResult<(StatusCode, Json<Item>)> {
    let item = engine.add_item(&list_name, &request.name, &user.principal).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /shoppingList/{list_name}/item/{item_name}
pub async fn get_item(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Path((list_name, item_name)): Path<(String, String)>,
) -> BackendResult<Json<Item>> {
    Ok(Json(engine.get_item(&list_name, &item_name, &user.principal).await?))
}

/// PUT /shoppingList/{list_name}/item/{item_name}
pub async fn rename_item(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Path((list_name, item_name)): Path<(String, String)>,
    Validated(request): Validated<NameRequest>,
) -> BackendResult<Json<Item>> {
    let item = engine
        .rename_item(&list_name, &item_name, &request.name, &user.principal)
        .await?;
    Ok(Json(item))
}

/// PUT /shoppingList/{list_name}/item/{item_name}/mark
pub async fn mark_item(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Path((list_name, item_name)): Path<(String, String)>,
    Validated(request): Validated<MarkItemRequest>,
) -> BackendResult<Json<Item>> {
    let item = engine
        .mark_item(&list_name, &item_name, request.checked, &user.principal)
        .await?;
    Ok(Json(item))
}

/// DELETE /shoppingList/{list_name}/item/{item_name}
pub async fn delete_item(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Path((list_name, item_name)): Path<(String, String)>,
) -> BackendResult<StatusCode> {
    engine.remove_item(&list_name, &item_name, &user.principal).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --------------------------------------------------------------------
// Members
// --------------------------------------------------------------------

/// POST /shoppingList/{list_name}/invite
pub async fn invite_member(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Path(list_name): Path<String>,
    Validated(request): Validated<NameRequest>,
) -> BackendResult<(StatusCode, Json<MembersResponse>)> {
    let members = engine
        .invite_member(&list_name, &request.name, &user.principal)
        .await?;
    Ok((StatusCode::CREATED, Json(MembersResponse { members })))
}

/// GET /shoppingList/{list_name}/members
pub async fn get_members(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Path(list_name): Path<String>,
) -> BackendResult<Json<Vec<Principal>>> {
    Ok(Json(engine.get_members(&list_name, &user.principal).await?))
}

/// DELETE /shoppingList/{list_name}/remove
pub async fn remove_member(
    State(engine): State<ListEngine>,
    AuthUser(user): AuthUser,
    Path(list_name): Path<String>,
    Validated(request): Validated<NameRequest>,
) -> BackendResult<Json<Membership>> {
    Ok(Json(
        engine
            .remove_member(&list_name, &request.name, &user.principal)
            .await?,
    ))
}
