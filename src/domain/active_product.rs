//! Active Products
//!
//! Products the user wants menus to favor during a window of time. This crate
//! stores and matches them; the activity-window evaluation of `scope` lives
//! with the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How long a product stays active. Stored for the caller; not evaluated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductScope {
    /// Active within the period it was added to
    #[default]
    InPeriod,
    /// Active until explicitly removed
    Persistent,
    /// Active until `until_date`
    UntilDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveProduct {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub scope: ProductScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until_date: Option<NaiveDate>,
    #[serde(default)]
    pub prefer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub hidden: bool,
}

/// Trim + lowercase, the normalization used for every name comparison in the
/// planner (product dedupe, pantry matching, ingredient matching).
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Count distinct active products that match any of the recipe's ingredient
/// names. A product matches when either normalized string contains the other.
/// Used for ranking recipes; ties are the caller's problem.
pub fn match_count<S: AsRef<str>, T: AsRef<str>>(
    recipe_ingredient_names: &[S],
    active_product_names: &[T],
) -> usize {
    let ingredients: Vec<String> = recipe_ingredient_names
        .iter()
        .map(|n| normalize_name(n.as_ref()))
        .filter(|n| !n.is_empty())
        .collect();

    active_product_names
        .iter()
        .map(|p| normalize_name(p.as_ref()))
        .filter(|product| {
            !product.is_empty()
                && ingredients
                    .iter()
                    .any(|ing| ing.contains(product.as_str()) || product.contains(ing.as_str()))
        })
        .count()
}
