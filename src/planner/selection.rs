//! Period Selection
//!
//! Remembers which period and week the user last looked at, plus the
//! day-structure mode of the grid. Tiny preferences with graceful defaults.

use chrono::NaiveDate;

use crate::domain::{DomainResult, PeriodRange};
use crate::repository::{keys, DocumentStore};

pub fn save_selected_range(docs: &dyn DocumentStore, range: &PeriodRange) -> DomainResult<()> {
    docs.write(keys::SELECTED_MENU_RANGE, &range.key())
}

pub fn load_selected_range(docs: &dyn DocumentStore) -> Option<PeriodRange> {
    match docs.read(keys::SELECTED_MENU_RANGE) {
        Ok(raw) => raw.and_then(|r| PeriodRange::parse_key(&r)),
        Err(e) => {
            log::warn!("Failed to read selected range: {}", e);
            None
        }
    }
}

pub fn save_week_start(docs: &dyn DocumentStore, start: NaiveDate) -> DomainResult<()> {
    docs.write(keys::SELECTED_WEEK_START, &start.format("%Y-%m-%d").to_string())
}

pub fn load_week_start(docs: &dyn DocumentStore) -> Option<NaiveDate> {
    match docs.read(keys::SELECTED_WEEK_START) {
        Ok(raw) => raw.and_then(|r| NaiveDate::parse_from_str(&r, "%Y-%m-%d").ok()),
        Err(e) => {
            log::warn!("Failed to read selected week start: {}", e);
            None
        }
    }
}

pub fn save_day_structure_mode(docs: &dyn DocumentStore, mode: &str) -> DomainResult<()> {
    docs.write(keys::DAY_STRUCTURE_MODE, mode)
}

/// The grid's day-structure mode; opaque to the planner.
pub fn load_day_structure_mode(docs: &dyn DocumentStore) -> Option<String> {
    match docs.read(keys::DAY_STRUCTURE_MODE) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Failed to read day structure mode: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryDocumentStore;

    #[test]
    fn test_selection_round_trip() {
        let docs = MemoryDocumentStore::new();
        assert!(load_selected_range(&docs).is_none());

        let range = PeriodRange::week_of(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        save_selected_range(&docs, &range).unwrap();
        assert_eq!(load_selected_range(&docs), Some(range));

        save_week_start(&docs, range.start).unwrap();
        assert_eq!(load_week_start(&docs), Some(range.start));
    }

    #[test]
    fn test_garbage_selection_is_none() {
        let docs = MemoryDocumentStore::new();
        docs.write(keys::SELECTED_MENU_RANGE, "garbage").unwrap();
        assert!(load_selected_range(&docs).is_none());
    }

    #[test]
    fn test_day_structure_mode() {
        let docs = MemoryDocumentStore::new();
        assert!(load_day_structure_mode(&docs).is_none());
        save_day_structure_mode(&docs, "compact").unwrap();
        assert_eq!(load_day_structure_mode(&docs).as_deref(), Some("compact"));
    }
}
