//! # citespine-storage
//!
//! SQLite persistence: corpus tables (chunks, document versions), the local
//! vector index table, the append-only manifest log, and the degradation log.
//! One serialized writer, a round-robin read pool, versioned migrations.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use citespine_core::errors::{CiteError, StorageError};

/// Wrap a message as a storage error.
pub fn to_storage_err(message: String) -> CiteError {
    CiteError::StorageError(StorageError::SqliteError { message })
}
