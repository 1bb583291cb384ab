//! Repository Layer - Core Traits
//!
//! Defines the abstract interface for document storage.
//! Implementations can use SQLite, in-memory, etc.

use crate::domain::DomainResult;

/// One JSON document per string key — the storage model the planner was built
/// against. Operations are synchronous: every store mutation persists before
/// it returns, so what the user sees is what is saved.
pub trait DocumentStore: Send + Sync {
    /// Read the document under `key`, `None` when absent.
    fn read(&self, key: &str) -> DomainResult<Option<String>>;

    /// Write (upsert) the document under `key`.
    fn write(&self, key: &str, value: &str) -> DomainResult<()>;

    /// Remove the document under `key`. Removing an absent key is fine.
    fn remove(&self, key: &str) -> DomainResult<()>;
}
