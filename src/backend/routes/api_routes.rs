/**
 * API Route Configuration
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /login` - login, registering unknown usernames
 * - `POST /logout` - revoke the presented token
 *
 * ## Lists
 * - `GET /shoppingList?archived=` - lists the caller owns or belongs to
 * - `POST|GET|PUT|DELETE /shoppingList/{list_name}`
 * - `GET /shoppingList/{list_name}/stats`
 *
 * ## Items
 * - `GET /shoppingList/{list_name}/items`
 * - `POST /shoppingList/{list_name}/item`
 * - `GET|PUT|DELETE /shoppingList/{list_name}/item/{item_name}`
 * - `PUT /shoppingList/{list_name}/item/{item_name}/mark`
 *
 * ## Members
 * - `POST /shoppingList/{list_name}/invite`
 * - `GET /shoppingList/{list_name}/members`
 * - `DELETE /shoppingList/{list_name}/remove`
 */

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::backend::auth::{login, logout};
use crate::backend::lists::handlers::{
    create_item, create_list, delete_item, delete_list, get_item, get_items, get_list,
    get_lists, get_members, get_stats, invite_member, mark_item, remove_member, rename_item,
    update_list,
};
use crate::backend::server::state::AppState;

/// Add the authentication routes
pub fn configure_auth_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Add the shopping list, item and member routes
///
/// Every route requires authentication; the handlers reject anonymous
/// requests with 401.
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/shoppingList", get(get_lists))
        .route(
            "/shoppingList/{list_name}",
            post(create_list)
                .get(get_list)
                .put(update_list)
                .delete(delete_list),
        )
        .route("/shoppingList/{list_name}/stats", get(get_stats))
        .route("/shoppingList/{list_name}/items", get(get_items))
        .route("/shoppingList/{list_name}/item", post(create_item))
        .route(
            "/shoppingList/{list_name}/item/{item_name}",
            get(get_item).put(rename_item).delete(delete_item),
        )
        .route(
            "/shoppingList/{list_name}/item/{item_name}/mark",
            put(mark_item),
        )
        .route("/shoppingList/{list_name}/invite", post(invite_member))
        .route("/shoppingList/{list_name}/members", get(get_members))
        .route(
            "/shoppingList/{list_name}/remove",
            axum::routing::delete(remove_member),
        )
}
