//! Database Connection and Setup
//!
//! SQLite-backed document store: one `documents` key/value table holding one
//! JSON document per key. Migrations run at open.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::domain::{DomainError, DomainResult};

use super::traits::DocumentStore;

/// Default database location under the user's data directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("menu-planner")
        .join("menu_planner.db")
}

/// Open (creating if necessary) the planner database and run migrations.
pub fn open_db(db_path: &Path) -> DomainResult<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DomainError::Internal(format!("Failed to create db dir: {}", e)))?;
        }
    }
    let conn = Connection::open(db_path)
        .map_err(|e| DomainError::Internal(format!("Failed to open db: {}", e)))?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;
    Ok(())
}

/// SQLite implementation of the document store
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Open the store at `db_path`, running migrations.
    pub fn open(db_path: &Path) -> DomainResult<Self> {
        Ok(Self::new(open_db(db_path)?))
    }

    fn lock(&self) -> DomainResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| DomainError::Internal("Database lock poisoned".to_string()))
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn read(&self, key: &str) -> DomainResult<Option<String>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM documents WHERE key = ?",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| DomainError::Internal(e.to_string()))
    }

    fn write(&self, key: &str, value: &str) -> DomainResult<()> {
        let conn = self.lock()?;
        let now = chrono::Local::now().timestamp_millis();
        conn.execute(
            "INSERT OR REPLACE INTO documents (key, value, updated_at) VALUES (?, ?, ?)",
            params![key, value, now],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> DomainResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM documents WHERE key = ?", params![key])
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(())
    }
}
