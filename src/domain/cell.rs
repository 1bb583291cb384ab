//! Cell Addresses
//!
//! A menu cell is one (date, meal slot) pair. Its storage key is the ISO date
//! and the meal label joined with a separator. Meal labels are free text and
//! may themselves contain the separator, so parsing always takes the first
//! date-shaped prefix.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Separator between the date and the meal label in a cell key.
pub const CELL_SEPARATOR: char = '-';

/// Parsed form of a cell key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellAddress {
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    /// Meal slot label, free text
    pub meal: String,
}

fn cell_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})-(.+)$").expect("valid cell pattern"))
}

/// Build a cell key from an ISO date and a meal label.
pub fn make_cell_key(date: &str, meal: &str) -> String {
    format!("{}{}{}", date, CELL_SEPARATOR, meal)
}

/// Split a cell key back into its date and meal label.
///
/// Returns `None` for keys without a strict `YYYY-MM-DD` prefix or with an
/// empty meal label. Historical documents contain garbage keys; those must be
/// skipped, never panicked on.
pub fn split_cell_key(key: &str) -> Option<CellAddress> {
    let caps = cell_pattern().captures(key)?;
    Some(CellAddress {
        date: caps[1].to_string(),
        meal: caps[2].to_string(),
    })
}
