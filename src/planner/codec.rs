//! Menu Bundle Codec
//!
//! Serializes and deserializes the versioned per-period payload. `parse` is
//! total: whatever the storage hands back — nothing, garbage, a pre-versioning
//! flat map, a current bundle — it returns a usable bundle with at least one
//! profile. Serialization always emits the current version; the legacy shape
//! is never written again.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::{
    MealData, MenuBundle, MenuItem, MenuProfile, PeopleCounts, BUNDLE_VERSION, DEFAULT_MENU_NAME,
};

/// Pre-versioning payloads carry no version field; they are treated as v1.
const LEGACY_VERSION: u32 = 1;

/// Per-item cooked flags that lived under a separate legacy key.
pub type CookedStatus = BTreeMap<String, bool>;

/// Parse the raw `weeklyMenu` document into a bundle.
///
/// `legacy_people` and `legacy_cooked` come from the separate legacy keys and
/// are merged into the migrated profile when the payload predates versioning.
/// Never returns an error and never panics.
pub fn parse(raw: Option<&str>, legacy_people: &PeopleCounts, legacy_cooked: &CookedStatus) -> MenuBundle {
    let value = match raw {
        Some(text) if !text.trim().is_empty() => match serde_json::from_str::<Value>(text) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Unreadable menu document, starting fresh: {}", e);
                return fresh_bundle(legacy_people, legacy_cooked);
            }
        },
        _ => return fresh_bundle(legacy_people, legacy_cooked),
    };

    let bundle = match detect_version(&value) {
        BUNDLE_VERSION => decode_v2(&value),
        _ => None,
    };
    let mut bundle =
        bundle.unwrap_or_else(|| migrate_legacy(&value, legacy_people, legacy_cooked));
    repair_ids(&mut bundle);
    bundle
}

/// Serialize the full profile set. Always emits the current version; this is
/// a one-way upgrade path.
pub fn serialize(menus: &[MenuProfile], active_menu_id: &str) -> String {
    let bundle = MenuBundle {
        version: BUNDLE_VERSION,
        active_menu_id: active_menu_id.to_string(),
        menus: menus.to_vec(),
    };
    serde_json::to_string(&bundle).unwrap_or_else(|e| {
        // Only reachable through non-finite floats; keep the storage valid.
        log::warn!("Menu bundle refused to serialize: {}", e);
        serialize(&[MenuProfile::new("menu-1", DEFAULT_MENU_NAME)], "menu-1")
    })
}

/// The one seam a future v3 migration plugs into.
fn detect_version(value: &Value) -> u32 {
    match value.get("version").and_then(Value::as_u64) {
        Some(v) if v == u64::from(BUNDLE_VERSION) && value.get("menus").is_some_and(Value::is_array) => {
            BUNDLE_VERSION
        }
        _ => LEGACY_VERSION,
    }
}

fn fresh_bundle(legacy_people: &PeopleCounts, legacy_cooked: &CookedStatus) -> MenuBundle {
    let mut profile = MenuProfile::new("menu-1", DEFAULT_MENU_NAME);
    profile.cell_people_count = legacy_people.clone();
    profile.cooked_status = legacy_cooked.clone();
    MenuBundle {
        version: BUNDLE_VERSION,
        active_menu_id: profile.id.clone(),
        menus: vec![profile],
    }
}

/// Decode a v2 payload. `None` when not a single profile is recoverable, in
/// which case the caller falls back to the legacy path.
fn decode_v2(value: &Value) -> Option<MenuBundle> {
    let menus: Vec<MenuProfile> = value
        .get("menus")?
        .as_array()?
        .iter()
        .filter_map(decode_profile)
        .collect();
    if menus.is_empty() {
        return None;
    }

    let requested = value.get("activeMenuId").and_then(Value::as_str).unwrap_or("");
    let active_menu_id = menus
        .iter()
        .find(|m| m.id == requested)
        .unwrap_or(&menus[0])
        .id
        .clone();

    Some(MenuBundle {
        version: BUNDLE_VERSION,
        active_menu_id,
        menus,
    })
}

/// A profile is recoverable when its name survives trimming. Malformed map
/// entries inside it are dropped silently.
fn decode_profile(value: &Value) -> Option<MenuProfile> {
    let obj = value.as_object()?;
    let name = obj.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let mut profile = MenuProfile::new(
        obj.get("id").and_then(Value::as_str).unwrap_or(""),
        name,
    );
    profile.meal_data = decode_meal_data(obj.get("mealData"));

    if let Some(counts) = obj.get("cellPeopleCount").and_then(Value::as_object) {
        for (cell, count) in counts {
            if let Some(n) = count.as_f64() {
                if n > 0.0 {
                    profile.cell_people_count.insert(cell.clone(), n as u32);
                }
            }
        }
    }
    if let Some(cooked) = obj.get("cookedStatus").and_then(Value::as_object) {
        for (item_id, flag) in cooked {
            if let Some(b) = flag.as_bool() {
                profile.cooked_status.insert(item_id.clone(), b);
            }
        }
    }
    Some(profile)
}

fn decode_meal_data(value: Option<&Value>) -> MealData {
    let mut meal_data = MealData::new();
    let Some(cells) = value.and_then(Value::as_object) else {
        return meal_data;
    };
    for (cell, entries) in cells {
        let Some(entries) = entries.as_array() else {
            continue;
        };
        let items: Vec<MenuItem> = entries
            .iter()
            .filter_map(|e| serde_json::from_value(e.clone()).ok())
            .collect();
        if !items.is_empty() {
            meal_data.insert(cell.clone(), items);
        }
    }
    meal_data
}

/// Wrap a pre-versioning flat `mealData` map into a single default profile,
/// merging in the people-count and cooked maps that lived under their own
/// legacy keys.
fn migrate_legacy(value: &Value, legacy_people: &PeopleCounts, legacy_cooked: &CookedStatus) -> MenuBundle {
    let mut profile = MenuProfile::new("menu-1", DEFAULT_MENU_NAME);
    profile.meal_data = decode_meal_data(Some(value));
    profile.cell_people_count = legacy_people.clone();
    profile.cooked_status = legacy_cooked.clone();
    MenuBundle {
        version: BUNDLE_VERSION,
        active_menu_id: profile.id.clone(),
        menus: vec![profile],
    }
}

/// Assign ids to profiles and items that arrived without one, scanning the
/// existing numeric suffixes so repaired ids never collide.
fn repair_ids(bundle: &mut MenuBundle) {
    let mut next_menu = next_suffix(bundle.menus.iter().map(|m| m.id.as_str()), "menu-");
    let mut next_item = next_suffix(
        bundle
            .menus
            .iter()
            .flat_map(|m| m.meal_data.values())
            .flatten()
            .map(MenuItem::id),
        "item-",
    );

    for menu in &mut bundle.menus {
        if menu.id.trim().is_empty() {
            menu.id = format!("menu-{}", next_menu);
            next_menu += 1;
        }
        for items in menu.meal_data.values_mut() {
            for item in items {
                if item.id().trim().is_empty() {
                    item.set_id(format!("item-{}", next_item));
                    next_item += 1;
                }
            }
        }
    }

    if !bundle.menus.iter().any(|m| m.id == bundle.active_menu_id) {
        bundle.active_menu_id = bundle.menus[0].id.clone();
    }
}

fn next_suffix<'a>(ids: impl Iterator<Item = &'a str>, prefix: &str) -> u64 {
    ids.filter_map(|id| id.strip_prefix(prefix).and_then(|n| n.parse::<u64>().ok()))
        .max()
        .unwrap_or(0)
        + 1
}
