//! Property-based tests for item storage
//!
//! Tests that names stay unique, order survives edits, stats add up and
//! toggling is its own inverse.

use proptest::prelude::*;
use sharelist::shared::{normalize_name, Item, ItemSet, MAX_NAME_LEN};

#[derive(Debug, Clone)]
enum ItemOp {
    Insert(String),
    Rename(String, String),
    Mark(String, Option<bool>),
    Remove(String),
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Bread", "Milk", "Eggs", "Tea", "Rice", "Salt"])
        .prop_map(str::to_string)
}

fn op_strategy() -> impl Strategy<Value = ItemOp> {
    prop_oneof![
        name_strategy().prop_map(ItemOp::Insert),
        (name_strategy(), name_strategy()).prop_map(|(a, b)| ItemOp::Rename(a, b)),
        (name_strategy(), prop::option::of(any::<bool>())).prop_map(|(n, c)| ItemOp::Mark(n, c)),
        name_strategy().prop_map(ItemOp::Remove),
    ]
}

/// Reference model: a plain vector with linear lookups
fn apply_model(model: &mut Vec<Item>, op: &ItemOp) {
    match op {
        ItemOp::Insert(name) => {
            if !model.iter().any(|i| &i.name == name) {
                model.push(Item::new(name.clone()));
            }
        }
        ItemOp::Rename(from, to) => {
            let taken = from != to && model.iter().any(|i| &i.name == to);
            if !taken {
                if let Some(item) = model.iter_mut().find(|i| &i.name == from) {
                    item.name = to.clone();
                }
            }
        }
        ItemOp::Mark(name, checked) => {
            if let Some(item) = model.iter_mut().find(|i| &i.name == name) {
                item.checked = checked.unwrap_or(!item.checked);
            }
        }
        ItemOp::Remove(name) => model.retain(|i| &i.name != name),
    }
}

fn apply_set(set: &mut ItemSet, op: &ItemOp) {
    match op {
        ItemOp::Insert(name) => {
            set.insert(Item::new(name.clone()));
        }
        ItemOp::Rename(from, to) => {
            set.rename(from, to);
        }
        ItemOp::Mark(name, checked) => {
            set.mark(name, *checked);
        }
        ItemOp::Remove(name) => {
            set.remove(name);
        }
    }
}

proptest! {
    #[test]
    fn test_item_set_matches_vector_model(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut set = ItemSet::new();
        let mut model = Vec::new();

        for op in &ops {
            apply_set(&mut set, op);
            apply_model(&mut model, op);

            prop_assert_eq!(set.as_slice(), model.as_slice());
            for item in &model {
                prop_assert_eq!(set.get(&item.name), Some(item));
            }
        }
    }

    #[test]
    fn test_stats_add_up(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut set = ItemSet::new();
        for op in &ops {
            apply_set(&mut set, op);
        }

        let stats = set.stats();
        prop_assert_eq!(stats.total, set.len());
        prop_assert_eq!(stats.completed + stats.pending, stats.total);
        prop_assert_eq!(stats.completed, set.iter().filter(|i| i.checked).count());
    }

    #[test]
    fn test_toggle_twice_is_identity(
        ops in prop::collection::vec(op_strategy(), 0..30),
        target in name_strategy(),
    ) {
        let mut set = ItemSet::new();
        for op in &ops {
            apply_set(&mut set, op);
        }
        let before = set.clone();

        set.mark(&target, None);
        set.mark(&target, None);

        prop_assert_eq!(set, before);
    }

    #[test]
    fn test_serialized_set_roundtrips_in_order(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut set = ItemSet::new();
        for op in &ops {
            apply_set(&mut set, op);
        }

        let json = serde_json::to_string(&set).unwrap();
        let back: ItemSet = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back.as_slice(), set.as_slice());
    }

    #[test]
    fn test_normalized_names_are_trimmed_and_bounded(raw in "\\PC{0,140}") {
        match normalize_name(&raw, "Item name") {
            Ok(name) => {
                prop_assert_eq!(name.as_str(), raw.trim());
                prop_assert!(!name.is_empty());
                prop_assert!(name.chars().count() <= MAX_NAME_LEN);
            }
            Err(_) => {
                let trimmed = raw.trim();
                prop_assert!(trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LEN);
            }
        }
    }
}
