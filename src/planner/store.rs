//! Menu Profile Store
//!
//! The authoritative in-memory state for one period: the named menu profiles,
//! the active pointer, and every edit operation. Each mutation persists the
//! full profile set immediately; storage failures degrade to an in-memory
//! session and never break the editing flow.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{
    deduct_from_pantry, scale_ingredients, split_cell_key, DomainError, DomainResult, Ingredient,
    MenuItem, MenuProfile, PantryItem, PeopleCounts, PeriodRange,
};
use crate::repository::{keys, DocumentStore};

use super::boundary::ShoppingSource;
use super::codec;
use super::registry::MealSlotRegistry;

/// People count a cell without an override is planned for.
const DEFAULT_PEOPLE_COUNT: u32 = 1;

/// Lookup port into the recipe book, for cooking a recipe item that carries
/// no ingredient snapshot. Implementations live with the recipe storage.
pub trait RecipeSource: Send + Sync {
    /// Ingredient list and base serving count of a saved recipe.
    fn recipe_ingredients(&self, recipe_id: &str) -> Option<(Vec<Ingredient>, u32)>;
}

pub struct MenuProfileStore {
    docs: Arc<dyn DocumentStore>,
    range_key: String,
    menus: Vec<MenuProfile>,
    active_menu_id: String,
}

impl MenuProfileStore {
    /// Load the period's bundle and make it the authoritative state.
    ///
    /// Meal slots referenced by stored cells but missing from the registry
    /// are synthesized (appended, visible) so no data is orphaned from the
    /// grid; the updated registry is persisted for the range.
    pub fn load(
        docs: Arc<dyn DocumentStore>,
        range: &PeriodRange,
        registry: &mut MealSlotRegistry,
    ) -> Self {
        let range_key = range.key();
        let raw = read_or_warn(docs.as_ref(), &keys::weekly_menu(&range_key));
        let legacy_people = read_people_map(docs.as_ref(), &keys::cell_people_count(&range_key));
        let legacy_cooked = read_cooked_map(docs.as_ref(), &keys::cooked_status(&range_key));

        let bundle = codec::parse(raw.as_deref(), &legacy_people, &legacy_cooked);

        let mut synthesized = false;
        for menu in &bundle.menus {
            for cell in menu.meal_data.keys() {
                if let Some(addr) = split_cell_key(cell) {
                    synthesized |= registry.ensure_slot(&addr.meal);
                }
            }
        }
        if synthesized {
            if let Err(e) = registry.save(docs.as_ref(), &range_key) {
                log::warn!("Failed to persist synthesized meal slots: {}", e);
            }
        }

        Self {
            docs,
            range_key,
            menus: bundle.menus,
            active_menu_id: bundle.active_menu_id,
        }
    }

    pub fn range_key(&self) -> &str {
        &self.range_key
    }

    pub fn menus(&self) -> &[MenuProfile] {
        &self.menus
    }

    pub fn active_menu_id(&self) -> &str {
        &self.active_menu_id
    }

    /// The active profile. The codec guarantees at least one profile.
    pub fn active(&self) -> &MenuProfile {
        self.menus
            .iter()
            .find(|m| m.id == self.active_menu_id)
            .unwrap_or(&self.menus[0])
    }

    fn active_mut(&mut self) -> &mut MenuProfile {
        let index = self
            .menus
            .iter()
            .position(|m| m.id == self.active_menu_id)
            .unwrap_or(0);
        &mut self.menus[index]
    }

    /// Items of a cell; an absent key is an empty list.
    pub fn items(&self, cell: &str) -> &[MenuItem] {
        self.active()
            .meal_data
            .get(cell)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Effective people count for a cell.
    pub fn people_count(&self, cell: &str) -> u32 {
        self.active()
            .cell_people_count
            .get(cell)
            .copied()
            .unwrap_or(DEFAULT_PEOPLE_COUNT)
    }

    fn name_taken(&self, name: &str, exclude_id: Option<&str>) -> bool {
        let wanted = name.to_lowercase();
        self.menus
            .iter()
            .any(|m| Some(m.id.as_str()) != exclude_id && m.name.to_lowercase() == wanted)
    }

    fn next_menu_id(&self) -> String {
        let max = self
            .menus
            .iter()
            .filter_map(|m| m.id.strip_prefix("menu-").and_then(|n| n.parse::<u64>().ok()))
            .max()
            .unwrap_or(0);
        format!("menu-{}", max + 1)
    }

    fn next_item_id(&self) -> String {
        let max = self
            .menus
            .iter()
            .flat_map(|m| m.meal_data.values())
            .flatten()
            .filter_map(|i| i.id().strip_prefix("item-").and_then(|n| n.parse::<u64>().ok()))
            .max()
            .unwrap_or(0);
        format!("item-{}", max + 1)
    }

    /// Append a new empty profile and switch to it.
    pub fn create_profile(&mut self, name: &str) -> DomainResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("Menu name is empty".into()));
        }
        if self.name_taken(name, None) {
            return Err(DomainError::Conflict(format!("Menu {} already exists", name)));
        }
        let id = self.next_menu_id();
        self.menus.push(MenuProfile::new(id.clone(), name));
        self.active_menu_id = id.clone();
        self.persist();
        Ok(id)
    }

    /// Switch the active pointer. Unknown or already-active ids are no-ops.
    pub fn select_profile(&mut self, menu_id: &str) {
        if menu_id == self.active_menu_id || !self.menus.iter().any(|m| m.id == menu_id) {
            return;
        }
        self.active_menu_id = menu_id.to_string();
        self.persist();
    }

    /// Rename the active profile in place.
    pub fn rename_active(&mut self, name: &str) -> DomainResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("Menu name is empty".into()));
        }
        let active_id = self.active().id.clone();
        if self.name_taken(name, Some(&active_id)) {
            return Err(DomainError::Conflict(format!("Menu {} already exists", name)));
        }
        self.active_mut().name = name.to_string();
        self.persist();
        Ok(())
    }

    /// Append an item to a cell, assigning an id when it arrives without one.
    /// Returns the item's id.
    pub fn add_item(&mut self, cell: &str, mut item: MenuItem) -> String {
        if item.id().trim().is_empty() {
            item.set_id(self.next_item_id());
        }
        let id = item.id().to_string();
        self.active_mut()
            .meal_data
            .entry(cell.to_string())
            .or_default()
            .push(item);
        self.persist();
        id
    }

    /// Replace the item at `index`. The existing id is kept when the
    /// replacement carries none, so cooked status stays attached.
    pub fn edit_item(&mut self, cell: &str, index: usize, mut item: MenuItem) -> DomainResult<()> {
        let profile = self.active_mut();
        let items = profile
            .meal_data
            .get_mut(cell)
            .ok_or_else(|| DomainError::NotFound(format!("Cell {}", cell)))?;
        let slot = items
            .get_mut(index)
            .ok_or_else(|| DomainError::NotFound(format!("Item {} in {}", index, cell)))?;
        if item.id().trim().is_empty() {
            item.set_id(slot.id().to_string());
        }
        *slot = item;
        self.persist();
        Ok(())
    }

    /// Remove the item at `index`. Removing the last item deletes the cell's
    /// key entirely; an absent key means an empty list.
    pub fn remove_item(&mut self, cell: &str, index: usize) -> DomainResult<()> {
        let profile = self.active_mut();
        let items = profile
            .meal_data
            .get_mut(cell)
            .ok_or_else(|| DomainError::NotFound(format!("Cell {}", cell)))?;
        if index >= items.len() {
            return Err(DomainError::NotFound(format!("Item {} in {}", index, cell)));
        }
        let removed = items.remove(index);
        if items.is_empty() {
            profile.meal_data.remove(cell);
        }
        profile.cooked_status.remove(removed.id());
        self.persist();
        Ok(())
    }

    /// Move an item to the end of another cell.
    pub fn move_item(&mut self, from_cell: &str, index: usize, to_cell: &str) -> DomainResult<()> {
        let profile = self.active_mut();
        let items = profile
            .meal_data
            .get_mut(from_cell)
            .ok_or_else(|| DomainError::NotFound(format!("Cell {}", from_cell)))?;
        if index >= items.len() {
            return Err(DomainError::NotFound(format!("Item {} in {}", index, from_cell)));
        }
        let item = items.remove(index);
        if items.is_empty() {
            profile.meal_data.remove(from_cell);
        }
        profile
            .meal_data
            .entry(to_cell.to_string())
            .or_default()
            .push(item);
        self.persist();
        Ok(())
    }

    /// Set the people-count override for a cell. Non-positive counts delete
    /// the override instead of storing zero.
    pub fn set_people_count(&mut self, cell: &str, count: i32) {
        let profile = self.active_mut();
        if count <= 0 {
            profile.cell_people_count.remove(cell);
        } else {
            profile.cell_people_count.insert(cell.to_string(), count as u32);
        }
        self.persist();
    }

    /// Flip the cooked flag of the item at `index`, mirror it into the
    /// profile's cooked-status map, and — when requested and the item just
    /// became cooked — deduct its effective ingredients from the pantry.
    ///
    /// The effective list is the item's snapshot when present, otherwise the
    /// referenced recipe scaled to the cell's current people count.
    pub fn mark_cooked(
        &mut self,
        cell: &str,
        index: usize,
        deduct: bool,
        recipes: Option<&dyn RecipeSource>,
    ) -> DomainResult<bool> {
        let people = self.people_count(cell);
        let profile = self.active_mut();
        let items = profile
            .meal_data
            .get_mut(cell)
            .ok_or_else(|| DomainError::NotFound(format!("Cell {}", cell)))?;
        let item = items
            .get_mut(index)
            .ok_or_else(|| DomainError::NotFound(format!("Item {} in {}", index, cell)))?;

        let now_cooked = !item.cooked();
        item.set_cooked(now_cooked);
        let item_id = item.id().to_string();

        let ingredients = if deduct && now_cooked {
            resolve_ingredients(item, people, recipes)
        } else {
            Vec::new()
        };

        profile.cooked_status.insert(item_id, now_cooked);

        if !ingredients.is_empty() {
            self.deduct_pantry(&ingredients);
        }
        self.persist();
        Ok(now_cooked)
    }

    fn deduct_pantry(&self, ingredients: &[Ingredient]) {
        let mut pantry: Vec<PantryItem> = read_or_warn(self.docs.as_ref(), keys::PANTRY_STOCK)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(items) => Some(items),
                Err(e) => {
                    log::warn!("Unreadable pantry stock, skipping deduction: {}", e);
                    None
                }
            })
            .unwrap_or_default();
        if pantry.is_empty() {
            return;
        }
        deduct_from_pantry(&mut pantry, ingredients);
        match serde_json::to_string(&pantry) {
            Ok(raw) => {
                if let Err(e) = self.docs.write(keys::PANTRY_STOCK, &raw) {
                    log::warn!("Failed to persist pantry stock: {}", e);
                }
            }
            Err(e) => log::warn!("Pantry stock refused to serialize: {}", e),
        }
    }

    /// Apply a meal slot rename to every profile of the period, merging
    /// colliding cells. The registry validates and performs the rename
    /// itself; this moves the data.
    pub fn apply_slot_rename(&mut self, old_name: &str, new_name: &str) {
        if old_name == new_name {
            return;
        }
        for menu in &mut self.menus {
            menu.meal_data = crate::domain::migrate_meal_data(&menu.meal_data, old_name, new_name);
            menu.cell_people_count =
                crate::domain::merge_people_counts(&menu.cell_people_count, old_name, new_name);
        }
        self.persist();
    }

    /// The resolved data the external shopping-list builder consumes: dish
    /// names of the active profile (honoring the include-in-shopping flag)
    /// and the per-cell people counts.
    pub fn shopping_source(&self) -> ShoppingSource {
        let profile = self.active();
        let mut dishes = Vec::new();
        for (cell, items) in &profile.meal_data {
            for item in items.iter().filter(|i| i.in_shopping()) {
                dishes.push(super::boundary::ShoppingDish {
                    cell: cell.clone(),
                    name: item.dish_name().to_string(),
                });
            }
        }
        ShoppingSource {
            dishes,
            people_counts: profile.cell_people_count.clone(),
        }
    }

    /// Write the full profile set (never just the active profile, so inactive
    /// profiles are never dropped) plus the legacy mirror keys. Failures are
    /// logged; the in-memory session continues.
    fn persist(&self) {
        let raw = codec::serialize(&self.menus, &self.active_menu_id);
        if let Err(e) = self.docs.write(&keys::weekly_menu(&self.range_key), &raw) {
            log::warn!("Failed to persist menu bundle, continuing in memory: {}", e);
        }

        let active = self.active();
        self.mirror(&keys::cell_people_count(&self.range_key), &active.cell_people_count);
        self.mirror(&keys::cooked_status(&self.range_key), &active.cooked_status);
    }

    fn mirror<T: serde::Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => {
                if let Err(e) = self.docs.write(key, &raw) {
                    log::warn!("Failed to persist mirror {}: {}", key, e);
                }
            }
            Err(e) => log::warn!("Mirror {} refused to serialize: {}", key, e),
        }
    }
}

/// Effective ingredient list of a cooked item: the explicit snapshot when
/// present, else the referenced recipe freshly scaled to the people count.
fn resolve_ingredients(
    item: &MenuItem,
    people: u32,
    recipes: Option<&dyn RecipeSource>,
) -> Vec<Ingredient> {
    if let Some(snapshot) = item.ingredients() {
        return snapshot.to_vec();
    }
    if let MenuItem::Recipe { recipe_id, .. } = item {
        if let Some((ingredients, base_servings)) =
            recipes.and_then(|r| r.recipe_ingredients(recipe_id))
        {
            return scale_ingredients(&ingredients, base_servings, people);
        }
    }
    Vec::new()
}

fn read_or_warn(docs: &dyn DocumentStore, key: &str) -> Option<String> {
    match docs.read(key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Failed to read {}, treating as absent: {}", key, e);
            None
        }
    }
}

fn read_people_map(docs: &dyn DocumentStore, key: &str) -> PeopleCounts {
    let Some(raw) = read_or_warn(docs, key) else {
        return PeopleCounts::new();
    };
    let Ok(value) = serde_json::from_str::<Value>(&raw) else {
        return PeopleCounts::new();
    };
    let mut counts = PeopleCounts::new();
    if let Some(obj) = value.as_object() {
        for (cell, count) in obj {
            if let Some(n) = count.as_f64() {
                if n > 0.0 {
                    counts.insert(cell.clone(), n as u32);
                }
            }
        }
    }
    counts
}

fn read_cooked_map(docs: &dyn DocumentStore, key: &str) -> BTreeMap<String, bool> {
    let Some(raw) = read_or_warn(docs, key) else {
        return BTreeMap::new();
    };
    let Ok(value) = serde_json::from_str::<Value>(&raw) else {
        return BTreeMap::new();
    };
    let mut cooked = BTreeMap::new();
    if let Some(obj) = value.as_object() {
        for (item_id, flag) in obj {
            if let Some(b) = flag.as_bool() {
                cooked.insert(item_id.clone(), b);
            }
        }
    }
    cooked
}
