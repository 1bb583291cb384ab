//! Repository Integration Tests
//!
//! Tests for the SQLite document store, in-memory and on disk.

#[cfg(test)]
mod tests {
    use crate::repository::{open_db, DocumentStore, SqliteDocumentStore};
    use std::path::Path;

    fn setup_test_store() -> SqliteDocumentStore {
        let conn = open_db(Path::new(":memory:")).expect("Failed to init test DB");
        SqliteDocumentStore::new(conn)
    }

    #[test]
    fn test_read_absent_key() {
        let store = setup_test_store();
        assert_eq!(store.read("weeklyMenu:2024-01-01__2024-01-07").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let store = setup_test_store();
        store.write("selectedMenuRange", "2024-01-01__2024-01-07").unwrap();
        assert_eq!(
            store.read("selectedMenuRange").unwrap().as_deref(),
            Some("2024-01-01__2024-01-07")
        );
    }

    #[test]
    fn test_write_is_upsert() {
        let store = setup_test_store();
        store.write("menuDayStructureMode", "standard").unwrap();
        store.write("menuDayStructureMode", "compact").unwrap();
        assert_eq!(
            store.read("menuDayStructureMode").unwrap().as_deref(),
            Some("compact")
        );
    }

    #[test]
    fn test_remove() {
        let store = setup_test_store();
        store.write("pantryStock", "[]").unwrap();
        store.remove("pantryStock").unwrap();
        assert_eq!(store.read("pantryStock").unwrap(), None);
        // removing an absent key is fine
        store.remove("pantryStock").unwrap();
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.db");

        {
            let store = SqliteDocumentStore::open(&path).unwrap();
            store.write("selectedWeekStart", "2024-03-04").unwrap();
        }

        let store = SqliteDocumentStore::open(&path).unwrap();
        assert_eq!(
            store.read("selectedWeekStart").unwrap().as_deref(),
            Some("2024-03-04")
        );
    }
}
