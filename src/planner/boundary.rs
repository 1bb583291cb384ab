//! Boundary Contracts
//!
//! Data the out-of-scope collaborators exchange with the planner: the
//! shopping-list builder consumes the resolved dish list, the assistant
//! widget reports its request lifecycle.

use serde::{Deserialize, Serialize};

use crate::domain::PeopleCounts;

/// One dish the shopping-list builder will expand into ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingDish {
    /// Cell address the dish is planned in.
    pub cell: String,
    /// Display name of the dish.
    pub name: String,
}

/// Everything the external shopping-list builder reads from the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingSource {
    pub dishes: Vec<ShoppingDish>,
    pub people_counts: PeopleCounts,
}

/// Lifecycle of an assistant menu-suggestion request, as surfaced to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum SuggestionStatus {
    Loading,
    Ready(String),
    Failed(String),
}
