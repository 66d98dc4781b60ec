/**
 * Authorization Gates
 *
 * Pure checks of a principal's relation to a list. Every list operation
 * runs one of these against the freshly loaded record before it touches
 * anything, and again on each optimistic-write retry.
 *
 * # Gates
 *
 * - `check_access` - owner or member
 * - `check_owner` - owner only
 * - `check_removable` - owner removing someone else, or anyone leaving
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::backend::error::{BackendError, BackendResult};
use crate::shared::{Principal, ShoppingList};

pub const NOT_A_MEMBER: &str = "You are not a member of this shopping list";
pub const OWNER_CANNOT_LEAVE: &str = "Owner cannot remove themselves from the shopping list";
pub const ONLY_OWNER_REMOVES_OTHERS: &str = "Only the owner can remove other members";

/// What happens when the owner removes themselves from `members`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerRemovalPolicy {
    /// The owner can never leave their own list
    #[default]
    Forbid,
    /// The owner may leave; ownership passes to the first remaining member
    Reassign,
}

impl FromStr for OwnerRemovalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forbid" => Ok(Self::Forbid),
            "reassign" => Ok(Self::Reassign),
            other => Err(format!("unknown owner removal policy '{other}' (expected forbid or reassign)")),
        }
    }
}

impl fmt::Display for OwnerRemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forbid => f.write_str("forbid"),
            Self::Reassign => f.write_str("reassign"),
        }
    }
}

/// Allowed iff `principal` is the owner or a member
pub fn check_access(list: &ShoppingList, principal: &Principal) -> BackendResult<()> {
    if list.has_access(principal) {
        Ok(())
    } else {
        Err(BackendError::forbidden(NOT_A_MEMBER))
    }
}

/// Allowed iff `principal` is the owner; `message` names the operation
pub fn check_owner(list: &ShoppingList, principal: &Principal, message: &str) -> BackendResult<()> {
    if list.is_owner(principal) {
        Ok(())
    } else {
        Err(BackendError::forbidden(message))
    }
}

/// Member removal gate
///
/// The owner may remove anyone else and anyone may remove themselves.
/// The owner removing themselves depends on `policy`: a `Conflict` under
/// `Forbid`, allowed under `Reassign`.
pub fn check_removable(
    list: &ShoppingList,
    actor: &Principal,
    target: &Principal,
    policy: OwnerRemovalPolicy,
) -> BackendResult<()> {
    let is_owner = list.is_owner(actor);
    let is_self = actor == target;

    match (is_owner, is_self) {
        (false, false) => Err(BackendError::forbidden(ONLY_OWNER_REMOVES_OTHERS)),
        (true, true) if policy == OwnerRemovalPolicy::Forbid => {
            Err(BackendError::conflict(OWNER_CANNOT_LEAVE))
        }
        _ => Ok(()),
    }
}
