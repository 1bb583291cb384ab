//! Menu Planner
//!
//! Local-first weekly menu planning: profiles of meal cells keyed by
//! `date-meal`, per-cell people counts, cooked tracking with pantry
//! deduction, and a per-period active-product list with best-effort cloud
//! mirroring.
//!
//! # Layers
//!
//! - [`domain`]: pure types and functions — cell addresses, periods,
//!   ingredient scaling, menu items, slot migration, pantry math.
//! - [`repository`]: the [`repository::DocumentStore`] port with SQLite and
//!   in-memory implementations, plus the document key scheme.
//! - [`planner`]: stateful operations — the versioned bundle codec, the meal
//!   slot registry, [`planner::MenuProfileStore`], the active-product list
//!   and period selection.
//! - [`sync`]: the debounced cloud worker. Optional; everything above works
//!   without it.

pub mod domain;
pub mod planner;
pub mod repository;
pub mod sync;
