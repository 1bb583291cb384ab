//! In-Memory Document Store
//!
//! Map-backed implementation for tests and in-memory-only sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

use super::traits::DocumentStore;

#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: Mutex<HashMap<String, String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents. Handy in tests.
    pub fn len(&self) -> usize {
        self.docs.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn read(&self, key: &str) -> DomainResult<Option<String>> {
        let docs = self
            .docs
            .lock()
            .map_err(|_| DomainError::Internal("Store lock poisoned".to_string()))?;
        Ok(docs.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> DomainResult<()> {
        let mut docs = self
            .docs
            .lock()
            .map_err(|_| DomainError::Internal("Store lock poisoned".to_string()))?;
        docs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> DomainResult<()> {
        let mut docs = self
            .docs
            .lock()
            .map_err(|_| DomainError::Internal("Store lock poisoned".to_string()))?;
        docs.remove(key);
        Ok(())
    }
}
