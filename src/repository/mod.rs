//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod memory;
pub mod keys;

#[cfg(test)]
mod tests;

pub use db::{default_db_path, open_db, SqliteDocumentStore};
pub use memory::MemoryDocumentStore;
pub use traits::DocumentStore;
