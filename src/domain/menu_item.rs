//! Menu Items
//!
//! A cell holds an ordered list of menu items: references to saved recipes, or
//! free-text entries. Ingredient lists on items are immutable snapshots of the
//! scaling decision made when the item was added or edited; they are never
//! recomputed afterwards.

use serde::{Deserialize, Serialize};

use super::ingredient::Ingredient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MenuItem {
    /// Reference to a saved recipe, with an optional cached title and scaled
    /// ingredient snapshot.
    #[serde(rename_all = "camelCase")]
    Recipe {
        #[serde(default)]
        id: String,
        recipe_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ingredients: Option<Vec<Ingredient>>,
        #[serde(default)]
        cooked: bool,
    },
    /// Free-text entry. Its ingredients matter only when the entry is flagged
    /// for the shopping list.
    #[serde(rename_all = "camelCase")]
    Text {
        #[serde(default)]
        id: String,
        #[serde(default)]
        value: String,
        #[serde(default)]
        include_in_shopping: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ingredients: Option<Vec<Ingredient>>,
        #[serde(default)]
        cooked: bool,
    },
}

impl MenuItem {
    pub fn id(&self) -> &str {
        match self {
            MenuItem::Recipe { id, .. } | MenuItem::Text { id, .. } => id,
        }
    }

    pub fn set_id(&mut self, new_id: impl Into<String>) {
        match self {
            MenuItem::Recipe { id, .. } | MenuItem::Text { id, .. } => *id = new_id.into(),
        }
    }

    pub fn cooked(&self) -> bool {
        match self {
            MenuItem::Recipe { cooked, .. } | MenuItem::Text { cooked, .. } => *cooked,
        }
    }

    pub fn set_cooked(&mut self, value: bool) {
        match self {
            MenuItem::Recipe { cooked, .. } | MenuItem::Text { cooked, .. } => *cooked = value,
        }
    }

    /// Display name of the dish. Recipe items fall back to the recipe id when
    /// no title was cached.
    pub fn dish_name(&self) -> &str {
        match self {
            MenuItem::Recipe {
                value, recipe_id, ..
            } => value.as_deref().unwrap_or(recipe_id),
            MenuItem::Text { value, .. } => value,
        }
    }

    /// Snapshot ingredient list, if one was attached.
    pub fn ingredients(&self) -> Option<&[Ingredient]> {
        match self {
            MenuItem::Recipe { ingredients, .. } | MenuItem::Text { ingredients, .. } => {
                ingredients.as_deref()
            }
        }
    }

    /// Whether the item contributes to the shopping list. Recipe items always
    /// do; text items only when explicitly flagged.
    pub fn in_shopping(&self) -> bool {
        match self {
            MenuItem::Recipe { .. } => true,
            MenuItem::Text {
                include_in_shopping, ..
            } => *include_in_shopping,
        }
    }
}
