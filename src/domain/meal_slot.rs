//! Meal Slots
//!
//! The ordered, nameable set of meal rows in the menu grid. Renaming a slot is
//! a data migration, not a field update: every cell addressed with the old
//! label has to move under the new one. That migration is a pure function here
//! so it stays independent of any UI event handler.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::cell::{make_cell_key, split_cell_key};
use super::menu_item::MenuItem;

/// Per-cell item lists, keyed by cell address.
pub type MealData = BTreeMap<String, Vec<MenuItem>>;
/// Per-cell people-count overrides, keyed by cell address.
pub type PeopleCounts = BTreeMap<String, u32>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSlotSetting {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub order: u32,
}

impl MealSlotSetting {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible: true,
            order,
        }
    }
}

/// Re-key every cell whose meal label equals `old_name` under `new_name`.
///
/// Colliding destination cells merge: the destination's existing items stay
/// first, the moved items append after them (the historical order). Keys that
/// do not parse as cell addresses are kept untouched.
pub fn migrate_meal_data(meal_data: &MealData, old_name: &str, new_name: &str) -> MealData {
    let is_source = |key: &str| matches!(split_cell_key(key), Some(a) if a.meal == old_name);

    // Two passes so that on a collision the destination's items land first
    // regardless of map iteration order.
    let mut result: MealData = BTreeMap::new();
    for (key, items) in meal_data {
        if !is_source(key) {
            result.insert(key.clone(), items.clone());
        }
    }
    for (key, items) in meal_data {
        if let Some(addr) = split_cell_key(key) {
            if addr.meal == old_name {
                let target = make_cell_key(&addr.date, new_name);
                result.entry(target).or_default().extend(items.clone());
            }
        }
    }
    result
}

/// Re-key people-count overrides for a slot rename. When both the source and
/// the destination cell carry a count, the destination's value wins.
pub fn merge_people_counts(counts: &PeopleCounts, old_name: &str, new_name: &str) -> PeopleCounts {
    let is_source = |key: &str| matches!(split_cell_key(key), Some(a) if a.meal == old_name);

    let mut result: PeopleCounts = BTreeMap::new();
    for (key, count) in counts {
        if !is_source(key) {
            result.insert(key.clone(), *count);
        }
    }
    for (key, count) in counts {
        if let Some(addr) = split_cell_key(key) {
            if addr.meal == old_name {
                let target = make_cell_key(&addr.date, new_name);
                result.entry(target).or_insert(*count);
            }
        }
    }
    result
}
