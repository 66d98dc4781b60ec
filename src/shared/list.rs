//! Shopping list model
//!
//! A [`ShoppingList`] is a named, owned, shared collection of [`Item`]s.
//! Items live in an [`ItemSet`]: an insertion-ordered sequence with a
//! name index, so existence checks and lookups do not scan the sequence
//! while listing keeps the order items were added in.
//!
//! # Invariants
//!
//! - Item names are unique within a list (exact, case-sensitive match).
//! - Renaming an item keeps its position; removing one keeps the relative
//!   order of the rest.
//! - `members` never contains duplicates. The owner has access even when
//!   not listed in `members`.
//!
//! Authorization decisions are not made here; see `backend::lists::access`.

use crate::shared::error::SharedError;
use crate::shared::principal::Principal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Longest accepted list, item or member name, counted after trimming.
pub const MAX_NAME_LEN: usize = 128;

/// Trim a user-supplied name and check it is non-empty and not oversized.
///
/// `what` is the human label used in the error message, e.g.
/// `"Item name"` yields `"Item name is required"`.
pub fn normalize_name(raw: &str, what: &str) -> Result<String, SharedError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation("name", format!("{what} is required")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(SharedError::validation(
            "name",
            format!("{what} is too long (max {MAX_NAME_LEN} chars)"),
        ));
    }
    Ok(trimmed.to_string())
}

/// A single entry of a shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub checked: bool,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checked: false,
        }
    }
}

/// Counts over a list's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Insertion-ordered items keyed by name.
///
/// Serialized as a plain JSON array of items. Deserializing an array that
/// contains the same name twice fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Item>", into = "Vec<Item>")]
pub struct ItemSet {
    items: Vec<Item>,
    index: HashMap<String, usize>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.index.get(name).map(|&pos| &self.items[pos])
    }

    /// Append an item. Returns `false` and leaves the set untouched when
    /// an item with the same name already exists.
    pub fn insert(&mut self, item: Item) -> bool {
        if self.index.contains_key(&item.name) {
            return false;
        }
        self.index.insert(item.name.clone(), self.items.len());
        self.items.push(item);
        true
    }

    /// Rename `from` to `to` in place.
    ///
    /// Returns `None` when `from` is missing or `to` is taken by another item.
    pub fn rename(&mut self, from: &str, to: &str) -> Option<&Item> {
        let pos = *self.index.get(from)?;
        if from != to {
            if self.index.contains_key(to) {
                return None;
            }
            self.index.remove(from);
            self.index.insert(to.to_string(), pos);
            self.items[pos].name = to.to_string();
        }
        Some(&self.items[pos])
    }

    /// Set `checked` explicitly, or flip it when `checked` is `None`.
    pub fn mark(&mut self, name: &str, checked: Option<bool>) -> Option<&Item> {
        let pos = *self.index.get(name)?;
        let current = self.items[pos].checked;
        self.items[pos].checked = checked.unwrap_or(!current);
        Some(&self.items[pos])
    }

    /// Remove an item, keeping the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<Item> {
        let pos = self.index.remove(name)?;
        let removed = self.items.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn stats(&self) -> ItemStats {
        let total = self.items.len();
        let completed = self.items.iter().filter(|item| item.checked).count();
        ItemStats {
            total,
            completed,
            pending: total - completed,
        }
    }
}

impl TryFrom<Vec<Item>> for ItemSet {
    type Error = SharedError;

    fn try_from(items: Vec<Item>) -> Result<Self, Self::Error> {
        let mut set = ItemSet::new();
        for item in items {
            let name = item.name.clone();
            if !set.insert(item) {
                return Err(SharedError::validation(
                    "items",
                    format!("duplicate item name: {name}"),
                ));
            }
        }
        Ok(set)
    }
}

impl From<ItemSet> for Vec<Item> {
    fn from(set: ItemSet) -> Self {
        set.items
    }
}

/// A named, owned, shared shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    /// Globally unique list name
    pub name: String,
    /// `None` only after the last member left under the `reassign` policy
    pub owner: Option<Principal>,
    /// Order-preserving, duplicate-free member sequence
    pub members: Vec<Principal>,
    /// Archived lists freeze their items, not their metadata
    pub archived: bool,
    pub items: ItemSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Identity of this record; a list re-created under a recycled name
    /// gets a new one
    #[serde(skip)]
    pub id: Uuid,
    /// Optimistic concurrency counter, owned by the store
    #[serde(skip)]
    pub version: u64,
}

impl ShoppingList {
    /// New list owned by `creator`, who is also its first member.
    pub fn new(name: impl Into<String>, creator: Principal) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            owner: Some(creator.clone()),
            members: vec![creator],
            archived: false,
            items: ItemSet::new(),
            created_at: now,
            updated_at: now,
            id: Uuid::new_v4(),
            version: 0,
        }
    }

    pub fn is_owner(&self, principal: &Principal) -> bool {
        self.owner.as_ref() == Some(principal)
    }

    pub fn is_member(&self, principal: &Principal) -> bool {
        self.members.contains(principal)
    }

    /// Owner or member.
    pub fn has_access(&self, principal: &Principal) -> bool {
        self.is_owner(principal) || self.is_member(principal)
    }

    /// Idempotent; returns `true` if the principal was newly added.
    pub fn add_member(&mut self, principal: Principal) -> bool {
        if self.is_member(&principal) {
            return false;
        }
        self.members.push(principal);
        true
    }

    /// Returns `true` if the principal was a member.
    pub fn remove_member(&mut self, principal: &Principal) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member != principal);
        self.members.len() != before
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
