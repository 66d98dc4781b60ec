//! Durable Store Module
//!
//! This module defines the persistence boundary of the backend. The list
//! engine and the authentication handlers only see the two traits below,
//! so the same logic runs against the in-memory store (tests, demos) and
//! against SQLite.
//!
//! # Architecture
//!
//! - **`ListStore`** - list records keyed by their unique name
//! - **`PrincipalDirectory`** - users and their opaque session tokens
//! - **`memory`** - `MemoryStore`, process-local implementation of both
//! - **`sqlite`** - `SqliteStore`, sqlx-backed implementation of both
//!
//! # Atomicity Contract
//!
//! - `ListStore::insert` is a single conditional insert: two concurrent
//!   inserts of the same name never both succeed.
//! - `ListStore::put` is an optimistic write. It only succeeds when the
//!   stored version still equals `list.version`, and it swaps the key in
//!   the same write when the list was renamed. Readers never observe a
//!   half-applied write, and a concurrent sibling update is never lost:
//!   the loser gets `StoreError::VersionConflict` and must reload.
//! - Operations on different list names are independent.

use async_trait::async_trait;
use thiserror::Error;

use crate::backend::auth::sessions::Session;
use crate::backend::auth::users::User;
use crate::shared::ShoppingList;

/// In-memory store
pub mod memory;

/// SQLite store
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Predicate used by [`ListStore::find_by`]
pub type ListPredicate<'a> = &'a (dyn Fn(&ShoppingList) -> bool + Send + Sync);

/// Store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A rename targeted a name held by another list
    #[error("list name already taken: {0}")]
    NameTaken(String),

    /// The stored record changed (or vanished) since it was loaded
    #[error("list {0} was modified concurrently")]
    VersionConflict(String),

    /// A persisted record could not be decoded
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Shopping list records keyed by unique name
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Load a list by name
    async fn get(&self, name: &str) -> StoreResult<Option<ShoppingList>>;

    /// Insert a new list; `false` if the name is already taken
    async fn insert(&self, list: &ShoppingList) -> StoreResult<bool>;

    /// Replace the list stored under `original_name` with `list`
    ///
    /// Succeeds only if the record under `original_name` is the same list
    /// (`list.id`) at the same version (`list.version`); returns the new
    /// version. `list.name` may differ from `original_name`, in
    /// which case the old key disappears and the new one appears atomically.
    async fn put(&self, original_name: &str, list: &ShoppingList) -> StoreResult<u64>;

    /// Delete `list` and everything it contains
    ///
    /// Succeeds only if the record stored under `list.name` is still this
    /// list at this version; if it changed, moved away, was replaced or is
    /// already gone the result is `VersionConflict`.
    async fn delete(&self, list: &ShoppingList) -> StoreResult<()>;

    /// All lists matching `predicate`, in insertion order
    async fn find_by(&self, predicate: ListPredicate<'_>) -> StoreResult<Vec<ShoppingList>>;
}

/// Users and sessions
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Look up a user by exact username
    async fn find_user(&self, username: &str) -> StoreResult<Option<User>>;

    /// Create a user; `false` if the username is taken
    async fn insert_user(&self, user: &User) -> StoreResult<bool>;

    /// Persist a freshly issued session
    async fn insert_session(&self, session: &Session) -> StoreResult<()>;

    /// Look up a session by token
    async fn find_session(&self, token: &str) -> StoreResult<Option<Session>>;

    /// Revoke a session; `false` if it did not exist
    async fn delete_session(&self, token: &str) -> StoreResult<bool>;
}
