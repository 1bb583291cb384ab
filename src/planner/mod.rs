//! Planner Layer
//!
//! Stateful operations over the domain: the bundle codec, the meal slot
//! registry, the authoritative profile store, the active-product list, period
//! selection and the boundary contracts.

pub mod codec;
mod registry;
mod store;
mod products;
mod selection;
mod boundary;

pub use boundary::{ShoppingDish, ShoppingSource, SuggestionStatus};
pub use products::{ActiveProductList, ChangeHook};
pub use registry::{MealSlotRegistry, MoveDirection};
pub use selection::{
    load_day_structure_mode, load_selected_range, load_week_start, save_day_structure_mode,
    save_selected_range, save_week_start,
};
pub use store::{MenuProfileStore, RecipeSource};
