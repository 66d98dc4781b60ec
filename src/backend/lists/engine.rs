/**
 * List Access & Mutation Engine
 *
 * Every list, item and member operation goes through `ListEngine`. The
 * engine holds no state of its own: each call loads the current record,
 * runs the authorization gates, validates the request against the record,
 * applies the change and writes it back.
 *
 * # Write Protocol
 *
 * Writes are optimistic. A mutation is a closure run against a freshly
 * loaded list; the result is written with `ListStore::put`, which only
 * succeeds if nobody else wrote the list in between. On a version
 * conflict the whole cycle (load, gates, closure, put) is repeated with
 * the new record, up to `MAX_WRITE_ATTEMPTS` times. A rejected gate or
 * failed check aborts the operation with nothing written.
 *
 * Within one engine, writers to the same list name queue on a per-name
 * lock, so version conflicts only arise between processes sharing a
 * database. Deletes follow the same protocol: the owner gate is checked
 * against the exact version that gets removed.
 *
 * # Check Order
 *
 * 1. List exists (`NotFound`)
 * 2. Relation gate (`Forbidden`)
 * 3. Archived gate for item mutations (`ArchivedReadOnly`)
 * 4. Input and uniqueness checks (`BadRequest`, `NotFound`, `Conflict`)
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::lists::access::{
    check_access, check_owner, check_removable, OwnerRemovalPolicy,
};
use crate::backend::store::{ListStore, PrincipalDirectory, StoreError};
use crate::shared::{normalize_name, Item, ItemStats, Principal, ShoppingList};

/// Reload-and-retry budget for one optimistic write
pub const MAX_WRITE_ATTEMPTS: usize = 8;

/// Pause before retry `n` is `n` times this
const RETRY_BACKOFF: Duration = Duration::from_millis(5);

pub const LIST_NOT_FOUND: &str = "Shopping list not found";
pub const LIST_EXISTS: &str = "Shopping list already exists";
pub const ITEM_NOT_FOUND: &str = "Item not found";
pub const ITEM_EXISTS: &str = "Item already exists";
pub const USER_NOT_FOUND: &str = "User not found";
pub const MEMBER_NOT_FOUND: &str = "Member not found in the shopping list";
pub const ONLY_OWNER_DELETES: &str = "Only the owner can delete this shopping list";
pub const ONLY_OWNER_MANAGES_MEMBERS: &str = "Only the owner can manage members";
pub const ONLY_OWNER_ARCHIVES: &str = "Only the owner can archive this shopping list";

/// Fields of a combined list update; `None` leaves the field alone
#[derive(Debug, Clone, Default)]
pub struct ListUpdate {
    pub name: Option<String>,
    pub archived: Option<bool>,
}

/// Membership after a removal, answered as `{ members, owner }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub members: Vec<Principal>,
    pub owner: Option<Principal>,
}

/// Per-name write locks
///
/// Entries nobody holds are pruned on the next acquire.
#[derive(Default)]
struct WriteLocks {
    by_name: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl WriteLocks {
    async fn acquire(&self, name: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut by_name = self.by_name.lock().await;
            by_name.retain(|_, lock| Arc::strong_count(lock) > 1);
            by_name.entry(name.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

/// The list access and mutation engine
#[derive(Clone)]
pub struct ListEngine {
    lists: Arc<dyn ListStore>,
    directory: Arc<dyn PrincipalDirectory>,
    policy: OwnerRemovalPolicy,
    write_locks: Arc<WriteLocks>,
}

impl ListEngine {
    pub fn new(
        lists: Arc<dyn ListStore>,
        directory: Arc<dyn PrincipalDirectory>,
        policy: OwnerRemovalPolicy,
    ) -> Self {
        Self {
            lists,
            directory,
            policy,
            write_locks: Arc::default(),
        }
    }

    pub fn policy(&self) -> OwnerRemovalPolicy {
        self.policy
    }

    // ----------------------------------------------------------------
    // Lists
    // ----------------------------------------------------------------

    /// Create a list owned by `creator`, who also becomes its first member
    pub async fn create_list(&self, raw_name: &str, creator: &Principal) -> BackendResult<ShoppingList> {
        let name = normalize_name(raw_name, "Shopping list name")?;
        let list = ShoppingList::new(name, creator.clone());

        if !self.lists.insert(&list).await? {
            return Err(BackendError::conflict(LIST_EXISTS));
        }
        tracing::info!("List {} created by {}", list.name, creator);
        Ok(list)
    }

    pub async fn get_list(&self, name: &str, actor: &Principal) -> BackendResult<ShoppingList> {
        let list = self.load(name).await?;
        check_access(&list, actor)?;
        Ok(list)
    }

    /// Lists the actor owns or belongs to, optionally filtered by archival
    pub async fn list_lists(
        &self,
        actor: &Principal,
        archived: Option<bool>,
    ) -> BackendResult<Vec<ShoppingList>> {
        let visible = |list: &ShoppingList| {
            list.has_access(actor) && archived.map_or(true, |wanted| list.archived == wanted)
        };
        Ok(self.lists.find_by(&visible).await?)
    }

    /// Apply a rename and/or archival change in one write
    ///
    /// Any member may rename; changing `archived` needs the owner.
    pub async fn update_list(
        &self,
        name: &str,
        update: ListUpdate,
        actor: &Principal,
    ) -> BackendResult<ShoppingList> {
        let new_name = update
            .name
            .as_deref()
            .map(|raw| normalize_name(raw, "Shopping list name"))
            .transpose()?;

        let (list, ()) = self
            .mutate(name, |list| {
                check_access(list, actor)?;
                if let Some(archived) = update.archived {
                    check_owner(list, actor, ONLY_OWNER_ARCHIVES)?;
                    list.archived = archived;
                }
                if let Some(new_name) = &new_name {
                    list.name.clone_from(new_name);
                }
                Ok(())
            })
            .await?;

        if list.name != name {
            tracing::info!("List {} renamed to {} by {}", name, list.name, actor);
        }
        Ok(list)
    }

    pub async fn rename_list(
        &self,
        name: &str,
        new_name: &str,
        actor: &Principal,
    ) -> BackendResult<ShoppingList> {
        let update = ListUpdate {
            name: Some(new_name.to_string()),
            archived: None,
        };
        self.update_list(name, update, actor).await
    }

    pub async fn set_archived(
        &self,
        name: &str,
        archived: bool,
        actor: &Principal,
    ) -> BackendResult<ShoppingList> {
        let update = ListUpdate {
            name: None,
            archived: Some(archived),
        };
        self.update_list(name, update, actor).await
    }

    /// Delete a list and all of its items; owner only
    ///
    /// The record removed is exactly the one the owner gate passed on; if
    /// the list changed in between, the gate runs again on the new record.
    pub async fn delete_list(&self, name: &str, actor: &Principal) -> BackendResult<()> {
        let _guard = self.write_locks.acquire(name).await;

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let list = self.load(name).await?;
            check_owner(&list, actor, ONLY_OWNER_DELETES)?;

            match self.lists.delete(&list).await {
                Ok(()) => {
                    tracing::info!("List {} deleted by {}", name, actor);
                    return Ok(());
                }
                Err(StoreError::VersionConflict(_)) => {
                    tracing::debug!("Delete of {} raced a write (attempt {}), retrying", name, attempt);
                    tokio::time::sleep(RETRY_BACKOFF * attempt as u32).await;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(BackendError::internal(format!(
            "gave up deleting {name} after {MAX_WRITE_ATTEMPTS} conflicting attempts"
        )))
    }

    // ----------------------------------------------------------------
    // Items
    // ----------------------------------------------------------------

    pub async fn add_item(&self, name: &str, raw_item: &str, actor: &Principal) -> BackendResult<Item> {
        let (_, item) = self
            .mutate(name, |list| {
                check_item_mutation(list, actor)?;
                let item_name = normalize_name(raw_item, "Item name")?;
                let item = Item::new(item_name);
                if !list.items.insert(item.clone()) {
                    return Err(BackendError::conflict(ITEM_EXISTS));
                }
                Ok(item)
            })
            .await?;
        Ok(item)
    }

    pub async fn list_items(&self, name: &str, actor: &Principal) -> BackendResult<Vec<Item>> {
        let list = self.get_list(name, actor).await?;
        Ok(list.items.into())
    }

    pub async fn get_item(&self, name: &str, item_name: &str, actor: &Principal) -> BackendResult<Item> {
        let list = self.get_list(name, actor).await?;
        list.items
            .get(item_name)
            .cloned()
            .ok_or_else(|| BackendError::not_found(ITEM_NOT_FOUND))
    }

    /// Rename an item in place; its position does not change
    pub async fn rename_item(
        &self,
        name: &str,
        item_name: &str,
        raw_new_name: &str,
        actor: &Principal,
    ) -> BackendResult<Item> {
        let (_, item) = self
            .mutate(name, |list| {
                check_item_mutation(list, actor)?;
                if !list.items.contains(item_name) {
                    return Err(BackendError::not_found(ITEM_NOT_FOUND));
                }
                let new_name = normalize_name(raw_new_name, "New name")?;
                list.items
                    .rename(item_name, &new_name)
                    .cloned()
                    .ok_or_else(|| BackendError::conflict(ITEM_EXISTS))
            })
            .await?;
        Ok(item)
    }

    /// Set `checked`, or toggle it when `checked` is `None`
    pub async fn mark_item(
        &self,
        name: &str,
        item_name: &str,
        checked: Option<bool>,
        actor: &Principal,
    ) -> BackendResult<Item> {
        let (_, item) = self
            .mutate(name, |list| {
                check_item_mutation(list, actor)?;
                list.items
                    .mark(item_name, checked)
                    .cloned()
                    .ok_or_else(|| BackendError::not_found(ITEM_NOT_FOUND))
            })
            .await?;
        Ok(item)
    }

    pub async fn remove_item(&self, name: &str, item_name: &str, actor: &Principal) -> BackendResult<()> {
        self.mutate(name, |list| {
            check_item_mutation(list, actor)?;
            list.items
                .remove(item_name)
                .map(|_| ())
                .ok_or_else(|| BackendError::not_found(ITEM_NOT_FOUND))
        })
        .await?;
        Ok(())
    }

    pub async fn item_stats(&self, name: &str, actor: &Principal) -> BackendResult<ItemStats> {
        let list = self.get_list(name, actor).await?;
        Ok(list.items.stats())
    }

    // ----------------------------------------------------------------
    // Members
    // ----------------------------------------------------------------

    /// Add an existing user to the members; idempotent
    pub async fn invite_member(
        &self,
        name: &str,
        raw_username: &str,
        actor: &Principal,
    ) -> BackendResult<Vec<Principal>> {
        let list = self.load(name).await?;
        check_owner(&list, actor, ONLY_OWNER_MANAGES_MEMBERS)?;
        let username = normalize_name(raw_username, "Member username")?;

        if self.directory.find_user(&username).await?.is_none() {
            return Err(BackendError::not_found(USER_NOT_FOUND));
        }

        let invitee = Principal::new(username);
        let (list, added) = self
            .mutate(name, |list| {
                check_owner(list, actor, ONLY_OWNER_MANAGES_MEMBERS)?;
                Ok(list.add_member(invitee.clone()))
            })
            .await?;

        if added {
            tracing::info!("{} invited {} to {}", actor, invitee, list.name);
        }
        Ok(list.members)
    }

    /// Remove a member, or leave the list
    ///
    /// Under `OwnerRemovalPolicy::Reassign` an owner who leaves hands the
    /// list to the first remaining member, or leaves it ownerless.
    pub async fn remove_member(
        &self,
        name: &str,
        raw_username: &str,
        actor: &Principal,
    ) -> BackendResult<Membership> {
        let target = Principal::new(normalize_name(raw_username, "Member username")?);
        let policy = self.policy;

        let (list, ()) = self
            .mutate(name, |list| {
                check_removable(list, actor, &target, policy)?;
                if !list.remove_member(&target) {
                    return Err(BackendError::not_found(MEMBER_NOT_FOUND));
                }
                if list.is_owner(&target) {
                    list.owner = list.members.first().cloned();
                }
                Ok(())
            })
            .await?;

        tracing::info!("{} removed {} from {}", actor, target, list.name);
        Ok(Membership {
            members: list.members,
            owner: list.owner,
        })
    }

    pub async fn get_members(&self, name: &str, actor: &Principal) -> BackendResult<Vec<Principal>> {
        let list = self.get_list(name, actor).await?;
        Ok(list.members)
    }

    // ----------------------------------------------------------------
    // Internals
    // ----------------------------------------------------------------

    async fn load(&self, name: &str) -> BackendResult<ShoppingList> {
        self.lists
            .get(name)
            .await?
            .ok_or_else(|| BackendError::not_found(LIST_NOT_FOUND))
    }

    /// Load, apply `change`, and write back with optimistic retries
    ///
    /// Returns the list as written together with `change`'s output.
    async fn mutate<T, F>(&self, name: &str, mut change: F) -> BackendResult<(ShoppingList, T)>
    where
        F: FnMut(&mut ShoppingList) -> BackendResult<T> + Send,
        T: Send,
    {
        let _guard = self.write_locks.acquire(name).await;

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let mut list = self.load(name).await?;
            let output = change(&mut list)?;
            list.touch();

            match self.lists.put(name, &list).await {
                Ok(version) => {
                    list.version = version;
                    return Ok((list, output));
                }
                Err(StoreError::VersionConflict(_)) => {
                    tracing::debug!("Write conflict on {} (attempt {}), retrying", name, attempt);
                    tokio::time::sleep(RETRY_BACKOFF * attempt as u32).await;
                }
                Err(StoreError::NameTaken(_)) => return Err(BackendError::conflict(LIST_EXISTS)),
                Err(err) => return Err(err.into()),
            }
        }

        Err(BackendError::internal(format!(
            "gave up writing {name} after {MAX_WRITE_ATTEMPTS} conflicting attempts"
        )))
    }
}

fn check_item_mutation(list: &ShoppingList, actor: &Principal) -> BackendResult<()> {
    check_access(list, actor)?;
    if list.archived {
        return Err(BackendError::ArchivedReadOnly);
    }
    Ok(())
}
