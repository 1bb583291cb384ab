//! Storage Keys
//!
//! Builders for every persisted document key. Per-period documents embed the
//! range key (`start__end`); the rest are singletons.

/// Current period selection (`start__end`).
pub const SELECTED_MENU_RANGE: &str = "selectedMenuRange";
/// Start of the currently selected week (`YYYY-MM-DD`).
pub const SELECTED_WEEK_START: &str = "selectedWeekStart";
/// Opaque day-structure mode the grid renderer reads.
pub const DAY_STRUCTURE_MODE: &str = "menuDayStructureMode";
/// Global "default for new periods" meal slot template.
pub const MEAL_STRUCTURE_DEFAULTS: &str = "menuMealStructureDefaults";
/// Flat pantry stock list.
pub const PANTRY_STOCK: &str = "pantryStock";

/// The versioned menu bundle for a period.
pub fn weekly_menu(range_key: &str) -> String {
    format!("weeklyMenu:{}", range_key)
}

/// Legacy mirror: flat cell → people-count map for the active profile.
pub fn cell_people_count(range_key: &str) -> String {
    format!("cellPeopleCount:{}", range_key)
}

/// Legacy mirror: flat item-id → cooked map for the active profile.
pub fn cooked_status(range_key: &str) -> String {
    format!("cookedStatus:{}", range_key)
}

/// Active/priority products for a period.
pub fn active_products(range_key: &str) -> String {
    format!("activeProducts:{}", range_key)
}

/// Per-period meal slot override.
pub fn meal_structure_settings(range_key: &str) -> String {
    format!("menuMealStructureSettings:{}", range_key)
}
