//! Pantry Ledger
//!
//! Flat stock list. Cooking a menu item deducts its countable ingredients
//! from matching rows; matching is by normalized name plus exact unit, and
//! amounts are clamped at zero. Missing rows are never auto-created.

use serde::{Deserialize, Serialize};

use super::active_product::normalize_name;
use super::ingredient::Ingredient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryItem {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

impl PantryItem {
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            unit: unit.into(),
        }
    }
}

/// Deduct the countable ingredients of a cooked item from the pantry.
///
/// An ingredient with no matching row is skipped. Amounts never go negative.
pub fn deduct_from_pantry(pantry: &mut [PantryItem], ingredients: &[Ingredient]) {
    for ingredient in ingredients.iter().filter(|i| i.is_countable()) {
        let wanted = normalize_name(&ingredient.name);
        if let Some(row) = pantry
            .iter_mut()
            .find(|row| normalize_name(&row.name) == wanted && row.unit == ingredient.unit)
        {
            row.amount = (row.amount - ingredient.amount).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduct_normalized_name_match() {
        let mut pantry = vec![PantryItem::new("овсянка", 500.0, "г")];
        let ingredients = vec![Ingredient::new("Овсянка", 100.0, "г")];
        deduct_from_pantry(&mut pantry, &ingredients);
        assert_eq!(pantry[0].amount, 400.0);
    }

    #[test]
    fn test_deduct_never_negative() {
        let mut pantry = vec![PantryItem::new("Молоко", 0.2, "л")];
        let ingredients = vec![Ingredient::new("молоко", 1.0, "л")];
        deduct_from_pantry(&mut pantry, &ingredients);
        assert_eq!(pantry[0].amount, 0.0);
        deduct_from_pantry(&mut pantry, &ingredients);
        assert_eq!(pantry[0].amount, 0.0);
    }

    #[test]
    fn test_unit_must_match_exactly() {
        let mut pantry = vec![PantryItem::new("Молоко", 2.0, "л")];
        let ingredients = vec![Ingredient::new("Молоко", 500.0, "мл")];
        deduct_from_pantry(&mut pantry, &ingredients);
        assert_eq!(pantry[0].amount, 2.0);
    }

    #[test]
    fn test_no_row_is_noop() {
        let mut pantry = vec![PantryItem::new("Рис", 1000.0, "г")];
        let ingredients = vec![Ingredient::new("Гречка", 200.0, "г")];
        deduct_from_pantry(&mut pantry, &ingredients);
        assert_eq!(pantry[0].amount, 1000.0);
    }

    #[test]
    fn test_non_countable_skipped() {
        let mut pantry = vec![PantryItem::new("Соль", 100.0, "г")];
        // "to taste" carries amount 0 and must not touch stock
        let ingredients = vec![Ingredient::new("Соль", 0.0, "по вкусу")];
        deduct_from_pantry(&mut pantry, &ingredients);
        assert_eq!(pantry[0].amount, 100.0);
    }
}
