//! Domain Layer
//!
//! Core entities and pure business rules. No storage, no IO.

mod error;
mod cell;
mod period;
mod ingredient;
mod menu_item;
mod meal_slot;
mod menu;
mod pantry;
mod active_product;

pub use error::{DomainError, DomainResult};
pub use cell::{make_cell_key, split_cell_key, CellAddress, CELL_SEPARATOR};
pub use period::PeriodRange;
pub use ingredient::{scale_ingredients, Ingredient};
pub use menu_item::MenuItem;
pub use meal_slot::{migrate_meal_data, merge_people_counts, MealData, MealSlotSetting, PeopleCounts};
pub use menu::{MenuBundle, MenuProfile, BUNDLE_VERSION, DEFAULT_MENU_NAME};
pub use pantry::{deduct_from_pantry, PantryItem};
pub use active_product::{match_count, normalize_name, ActiveProduct, ProductScope};
