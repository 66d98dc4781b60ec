/**
 * In-Memory Store
 *
 * Process-local implementation of `ListStore` and `PrincipalDirectory`.
 * It is injected wherever no database is configured and backs the unit
 * and HTTP tests.
 *
 * # Thread Safety
 *
 * Each table sits behind its own `tokio::sync::RwLock`. Every write
 * (conditional insert, versioned put, delete) runs entirely under the
 * write guard, which is what makes them atomic.
 */

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::backend::auth::sessions::Session;
use crate::backend::auth::users::User;
use crate::backend::store::{
    ListPredicate, ListStore, PrincipalDirectory, StoreError, StoreResult,
};
use crate::shared::ShoppingList;

/// A list plus the sequence number it was inserted with
#[derive(Debug, Clone)]
struct StoredList {
    seq: u64,
    list: ShoppingList,
}

#[derive(Debug, Default)]
struct ListTable {
    next_seq: u64,
    by_name: HashMap<String, StoredList>,
}

/// In-memory list, user and session store
#[derive(Debug, Default)]
pub struct MemoryStore {
    lists: RwLock<ListTable>,
    users: RwLock<HashMap<String, User>>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored lists
    pub async fn list_count(&self) -> usize {
        self.lists.read().await.by_name.len()
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn get(&self, name: &str) -> StoreResult<Option<ShoppingList>> {
        let table = self.lists.read().await;
        Ok(table.by_name.get(name).map(|stored| stored.list.clone()))
    }

    async fn insert(&self, list: &ShoppingList) -> StoreResult<bool> {
        let mut table = self.lists.write().await;
        if table.by_name.contains_key(&list.name) {
            return Ok(false);
        }
        let seq = table.next_seq;
        table.next_seq += 1;
        table.by_name.insert(
            list.name.clone(),
            StoredList {
                seq,
                list: list.clone(),
            },
        );
        Ok(true)
    }

    async fn put(&self, original_name: &str, list: &ShoppingList) -> StoreResult<u64> {
        let mut table = self.lists.write().await;

        let seq = match table.by_name.get(original_name) {
            Some(stored) if stored.list.id == list.id && stored.list.version == list.version => {
                stored.seq
            }
            _ => return Err(StoreError::VersionConflict(original_name.to_string())),
        };
        if list.name != original_name && table.by_name.contains_key(&list.name) {
            return Err(StoreError::NameTaken(list.name.clone()));
        }

        let mut updated = list.clone();
        updated.version = list.version + 1;
        let version = updated.version;

        table.by_name.remove(original_name);
        table.by_name.insert(updated.name.clone(), StoredList { seq, list: updated });
        Ok(version)
    }

    async fn delete(&self, list: &ShoppingList) -> StoreResult<()> {
        let mut table = self.lists.write().await;
        let current = table
            .by_name
            .get(&list.name)
            .is_some_and(|stored| stored.list.id == list.id && stored.list.version == list.version);
        if !current {
            return Err(StoreError::VersionConflict(list.name.clone()));
        }
        table.by_name.remove(&list.name);
        Ok(())
    }

    async fn find_by(&self, predicate: ListPredicate<'_>) -> StoreResult<Vec<ShoppingList>> {
        let table = self.lists.read().await;
        let mut matches: Vec<&StoredList> = table
            .by_name
            .values()
            .filter(|stored| predicate(&stored.list))
            .collect();
        matches.sort_by_key(|stored| stored.seq);
        Ok(matches.into_iter().map(|stored| stored.list.clone()).collect())
    }
}

#[async_trait]
impl PrincipalDirectory for MemoryStore {
    async fn find_user(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Ok(false);
        }
        users.insert(user.username.clone(), user.clone());
        Ok(true)
    }

    async fn insert_session(&self, session: &Session) -> StoreResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn find_session(&self, token: &str) -> StoreResult<Option<Session>> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> StoreResult<bool> {
        Ok(self.sessions.write().await.remove(token).is_some())
    }
}
