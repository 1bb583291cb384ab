//! Meal Slot Registry
//!
//! The ordered, show/hideable set of meal slots for the current period.
//! Persistence has two tiers: a per-period override and a global "default for
//! new periods" template; a never-before-seen range falls back to the global
//! default, then to the three canonical slots.

use serde_json::Value;

use crate::domain::{DomainError, DomainResult, MealSlotSetting};
use crate::repository::{keys, DocumentStore};

/// Canonical slots used when neither persistence tier has anything.
const CANONICAL_SLOTS: [&str; 3] = ["Завтрак", "Обед", "Ужин"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealSlotRegistry {
    slots: Vec<MealSlotSetting>,
}

impl MealSlotRegistry {
    /// The three canonical slots.
    pub fn canonical() -> Self {
        let slots = CANONICAL_SLOTS
            .iter()
            .enumerate()
            .map(|(i, name)| MealSlotSetting::new(format!("slot-{}", i + 1), *name, i as u32))
            .collect();
        Self { slots }
    }

    /// Load the registry for a range: per-range override, else global
    /// default, else canonical. Unreadable tiers are skipped, not errors.
    pub fn load(docs: &dyn DocumentStore, range_key: &str) -> Self {
        for key in [keys::meal_structure_settings(range_key), keys::MEAL_STRUCTURE_DEFAULTS.to_string()] {
            match docs.read(&key) {
                Ok(Some(raw)) => {
                    if let Some(registry) = Self::decode(&raw) {
                        return registry;
                    }
                    log::warn!("Unreadable meal structure under {}, trying next tier", key);
                }
                Ok(None) => {}
                Err(e) => log::warn!("Failed to read {}: {}", key, e),
            }
        }
        Self::canonical()
    }

    fn decode(raw: &str) -> Option<Self> {
        let entries = serde_json::from_str::<Vec<Value>>(raw).ok()?;
        let mut slots: Vec<MealSlotSetting> = entries
            .into_iter()
            .filter_map(|e| serde_json::from_value(e).ok())
            .collect();
        if slots.is_empty() {
            return None;
        }
        slots.sort_by_key(|s| s.order);
        let mut registry = Self { slots };
        registry.renumber();
        Some(registry)
    }

    /// Persist as the per-range override.
    pub fn save(&self, docs: &dyn DocumentStore, range_key: &str) -> DomainResult<()> {
        let raw = serde_json::to_string(&self.slots)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        docs.write(&keys::meal_structure_settings(range_key), &raw)
    }

    /// Persist as the global template new periods start from.
    pub fn save_as_default(&self, docs: &dyn DocumentStore) -> DomainResult<()> {
        let raw = serde_json::to_string(&self.slots)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        docs.write(keys::MEAL_STRUCTURE_DEFAULTS, &raw)
    }

    pub fn slots(&self) -> &[MealSlotSetting] {
        &self.slots
    }

    pub fn visible_slots(&self) -> impl Iterator<Item = &MealSlotSetting> {
        self.slots.iter().filter(|s| s.visible)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        let wanted = name.trim().to_lowercase();
        self.slots.iter().any(|s| s.name.to_lowercase() == wanted)
    }

    fn find_mut(&mut self, slot_id: &str) -> DomainResult<&mut MealSlotSetting> {
        self.slots
            .iter_mut()
            .find(|s| s.id == slot_id)
            .ok_or_else(|| DomainError::NotFound(format!("Meal slot {}", slot_id)))
    }

    fn next_id(&self) -> String {
        let max = self
            .slots
            .iter()
            .filter_map(|s| s.id.strip_prefix("slot-").and_then(|n| n.parse::<u64>().ok()))
            .max()
            .unwrap_or(0);
        format!("slot-{}", max + 1)
    }

    fn renumber(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.order = i as u32;
        }
    }

    /// Append a new visible slot at the end. Rejects empty and
    /// case-insensitively duplicate names.
    pub fn add(&mut self, name: &str) -> DomainResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("Meal slot name is empty".into()));
        }
        if self.contains_name(name) {
            return Err(DomainError::Conflict(format!("Meal slot {} already exists", name)));
        }
        let id = self.next_id();
        let order = self.slots.len() as u32;
        self.slots.push(MealSlotSetting::new(id.clone(), name, order));
        Ok(id)
    }

    /// Append a slot synthesized from loaded cell data so no cell is orphaned
    /// from the grid. Returns false when the name is already registered.
    pub fn ensure_slot(&mut self, name: &str) -> bool {
        if name.trim().is_empty() || self.contains_name(name) {
            return false;
        }
        let id = self.next_id();
        let order = self.slots.len() as u32;
        self.slots.push(MealSlotSetting::new(id, name.trim(), order));
        true
    }

    /// Rename a slot. Returns `(old_name, new_name)` so the caller can
    /// migrate the period's cell data; rejected on a case-insensitive
    /// collision with another slot.
    pub fn rename(&mut self, slot_id: &str, new_name: &str) -> DomainResult<(String, String)> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(DomainError::InvalidInput("Meal slot name is empty".into()));
        }
        let collides = self.slots.iter().any(|s| {
            s.id != slot_id && s.name.to_lowercase() == new_name.to_lowercase()
        });
        if collides {
            return Err(DomainError::Conflict(format!("Meal slot {} already exists", new_name)));
        }
        let slot = self.find_mut(slot_id)?;
        let old_name = std::mem::replace(&mut slot.name, new_name.to_string());
        Ok((old_name, new_name.to_string()))
    }

    /// Flip a slot's visibility; returns the new state.
    pub fn toggle_visibility(&mut self, slot_id: &str) -> DomainResult<bool> {
        let slot = self.find_mut(slot_id)?;
        slot.visible = !slot.visible;
        Ok(slot.visible)
    }

    /// Move a slot one step up or down; stepping past the edge is a no-op.
    /// Orders are renumbered densely from 0.
    pub fn reorder(&mut self, slot_id: &str, direction: MoveDirection) -> DomainResult<()> {
        let index = self
            .slots
            .iter()
            .position(|s| s.id == slot_id)
            .ok_or_else(|| DomainError::NotFound(format!("Meal slot {}", slot_id)))?;
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => (index + 1 < self.slots.len()).then_some(index + 1),
        };
        if let Some(target) = target {
            self.slots.swap(index, target);
            self.renumber();
        }
        Ok(())
    }
}
