//! Menu Profiles and the Storage Bundle
//!
//! A user may keep several independently-addressable menus for one period
//! (e.g. per client). They travel together in one versioned bundle keyed by
//! the period range.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::meal_slot::{MealData, PeopleCounts};

/// Name given to the single profile created from legacy or empty storage.
pub const DEFAULT_MENU_NAME: &str = "Меню 1";

/// Current on-disk bundle version.
pub const BUNDLE_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub meal_data: MealData,
    #[serde(default)]
    pub cell_people_count: PeopleCounts,
    #[serde(default)]
    pub cooked_status: BTreeMap<String, bool>,
}

impl MenuProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            meal_data: BTreeMap::new(),
            cell_people_count: BTreeMap::new(),
            cooked_status: BTreeMap::new(),
        }
    }
}

/// The full persisted payload for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuBundle {
    pub version: u32,
    pub active_menu_id: String,
    pub menus: Vec<MenuProfile>,
}

impl MenuBundle {
    /// The profile `active_menu_id` points at, falling back to the first
    /// profile when the pointer is stale. The codec never produces an empty
    /// `menus` list, so the fallback always exists.
    pub fn active(&self) -> &MenuProfile {
        self.menus
            .iter()
            .find(|m| m.id == self.active_menu_id)
            .unwrap_or(&self.menus[0])
    }
}
