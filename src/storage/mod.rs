//! SQLite storage layer for the sync core.
//!
//! This module provides the persistence layer using SQLite with:
//! - WAL mode for concurrent reads
//! - Snapshot rows for the Local Session Store
//! - Well-known-key blobs for the Operation Queue
//!
//! # Submodules
//!
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main SQLite storage implementation

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteStorage;

/// Handle shared between the session store, the queue, and the drainer.
///
/// The core is single-writer per device (UI call sequence plus at most
/// one drain task), so a plain mutex around the connection is enough.
pub type SharedStorage = Arc<Mutex<SqliteStorage>>;

/// Wrap a storage backend for sharing.
#[must_use]
pub fn shared(storage: SqliteStorage) -> SharedStorage {
    Arc::new(Mutex::new(storage))
}

/// Lock the shared storage, recovering from poisoning.
///
/// Every mutation commits memory only after disk, so a panicked holder
/// cannot leave half-applied state behind.
pub(crate) fn lock(storage: &SharedStorage) -> MutexGuard<'_, SqliteStorage> {
    storage.lock().unwrap_or_else(PoisonError::into_inner)
}
