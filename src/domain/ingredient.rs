//! Ingredient Model and Scaler
//!
//! An ingredient is countable when it names a product and carries a
//! quantifiable amount. Only countable ingredients participate in scaling and
//! pantry deduction; "to taste" amounts are qualitative and never scaled.

use serde::{Deserialize, Serialize};

/// Units whose amount is qualitative. Historical documents are Russian-first.
const TO_TASTE_UNITS: [&str; 2] = ["по вкусу", "to taste"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            amount,
            unit: unit.into(),
        }
    }

    /// Whether the unit represents "to taste".
    pub fn is_to_taste(&self) -> bool {
        let unit = self.unit.trim().to_lowercase();
        TO_TASTE_UNITS.contains(&unit.as_str())
    }

    /// Countable iff the name is non-empty and the amount is quantifiable
    /// (positive, or "to taste" which stands on its own).
    pub fn is_countable(&self) -> bool {
        !self.name.trim().is_empty() && (self.is_to_taste() || self.amount > 0.0)
    }
}

/// Scale a recipe's ingredient list from its base serving count to the
/// requested party size.
///
/// Non-countable ingredients are filtered out. "To taste" ingredients pass
/// through with amount 0. Both counts are clamped to at least 1, so the
/// factor is always finite and positive.
pub fn scale_ingredients(
    ingredients: &[Ingredient],
    base_servings: u32,
    target_people: u32,
) -> Vec<Ingredient> {
    let base = base_servings.max(1);
    let people = target_people.max(1);
    let factor = f64::from(people) / f64::from(base);

    ingredients
        .iter()
        .filter(|ing| ing.is_countable())
        .map(|ing| {
            let mut scaled = ing.clone();
            scaled.amount = if ing.is_to_taste() {
                0.0
            } else {
                ing.amount * factor
            };
            scaled
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Ingredient> {
        vec![
            Ingredient::new("Овсянка", 100.0, "г"),
            Ingredient::new("Молоко", 0.25, "л"),
            Ingredient::new("Соль", 0.0, "по вкусу"),
            Ingredient::new("", 50.0, "г"),       // nameless, not countable
            Ingredient::new("Сахар", 0.0, "г"),   // zero amount, not countable
        ]
    }

    #[test]
    fn test_countable() {
        let ings = sample();
        assert!(ings[0].is_countable());
        assert!(ings[2].is_countable()); // to taste counts
        assert!(!ings[3].is_countable());
        assert!(!ings[4].is_countable());
    }

    #[test]
    fn test_scale_identity() {
        for servings in [1, 2, 4] {
            let scaled = scale_ingredients(&sample(), servings, servings);
            assert_eq!(scaled.len(), 3);
            assert_eq!(scaled[0].amount, 100.0);
            assert_eq!(scaled[1].amount, 0.25);
        }
    }

    #[test]
    fn test_scale_linear() {
        let once = scale_ingredients(&sample(), 2, 3);
        let twice = scale_ingredients(&sample(), 2, 6);
        assert_eq!(twice[0].amount, 2.0 * once[0].amount);
        assert_eq!(twice[1].amount, 2.0 * once[1].amount);
    }

    #[test]
    fn test_to_taste_passes_through_at_zero() {
        let scaled = scale_ingredients(&sample(), 2, 8);
        let salt = scaled.iter().find(|i| i.name == "Соль").unwrap();
        assert_eq!(salt.amount, 0.0);
        assert_eq!(salt.unit, "по вкусу");
    }

    #[test]
    fn test_zero_counts_clamped() {
        let scaled = scale_ingredients(&sample(), 0, 0);
        assert_eq!(scaled[0].amount, 100.0); // factor 1/1
        let scaled = scale_ingredients(&sample(), 0, 3);
        assert_eq!(scaled[0].amount, 300.0);
    }

    #[test]
    fn test_deterministic() {
        let a = scale_ingredients(&sample(), 3, 7);
        let b = scale_ingredients(&sample(), 3, 7);
        assert_eq!(a, b);
    }
}
