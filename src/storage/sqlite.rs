//! SQLite storage implementation.
//!
//! Low-level persistence primitives shared by the session store and the
//! operation queue: snapshot rows keyed by session id, and well-known-key
//! blobs for process-wide sync state. Higher-level semantics (dedup,
//! snapshot patching) live in [`crate::store`] and [`crate::queue`].

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;
use crate::storage::schema::apply_schema;

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        if let Some(timeout) = timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        } else {
            // Default 5 second timeout
            conn.busy_timeout(Duration::from_secs(5))?;
        }

        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection.
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // ── Snapshot rows ─────────────────────────────────────────────

    /// Insert or fully replace the snapshot payload for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn put_snapshot(&self, session_id: &str, payload: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO session_snapshots (session_id, payload, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(session_id) DO UPDATE SET
                 payload = excluded.payload,
                 updated_at = excluded.updated_at",
            rusqlite::params![session_id, payload, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    /// Read the snapshot payload for a session, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn get_snapshot(&self, session_id: &str) -> Result<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM session_snapshots WHERE session_id = ?1",
                [session_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payload)
    }

    /// Delete the snapshot for a session. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_snapshot(&self, session_id: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM session_snapshots WHERE session_id = ?1",
            [session_id],
        )?;
        Ok(())
    }

    // ── Well-known-key blobs ──────────────────────────────────────

    /// Insert or fully replace a sync-state blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn put_blob(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sync_state (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = excluded.updated_at",
            rusqlite::params![key, value, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    /// Read a sync-state blob, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn get_blob(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM sync_state WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("hooplog.db");

        let storage = SqliteStorage::open(&path).unwrap();
        assert!(path.exists());
        drop(storage);
    }

    #[test]
    fn test_snapshot_put_get_delete() {
        let storage = SqliteStorage::open_memory().unwrap();

        assert_eq!(storage.get_snapshot("sess_1").unwrap(), None);

        storage.put_snapshot("sess_1", r#"{"a":1}"#).unwrap();
        assert_eq!(
            storage.get_snapshot("sess_1").unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );

        // Overwrite is not an error
        storage.put_snapshot("sess_1", r#"{"a":2}"#).unwrap();
        assert_eq!(
            storage.get_snapshot("sess_1").unwrap().as_deref(),
            Some(r#"{"a":2}"#)
        );

        storage.delete_snapshot("sess_1").unwrap();
        assert_eq!(storage.get_snapshot("sess_1").unwrap(), None);

        // Deleting an absent id is not an error
        storage.delete_snapshot("sess_1").unwrap();
    }

    #[test]
    fn test_blob_roundtrip() {
        let storage = SqliteStorage::open_memory().unwrap();

        assert_eq!(storage.get_blob("pending_ops").unwrap(), None);

        storage.put_blob("pending_ops", "[]").unwrap();
        assert_eq!(
            storage.get_blob("pending_ops").unwrap().as_deref(),
            Some("[]")
        );

        storage.put_blob("pending_ops", "[1,2]").unwrap();
        assert_eq!(
            storage.get_blob("pending_ops").unwrap().as_deref(),
            Some("[1,2]")
        );
    }

    #[test]
    fn test_blobs_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hooplog.db");

        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.put_blob("pending_ops", r#"["op"]"#).unwrap();
            storage.put_snapshot("sess_1", "{}").unwrap();
        }

        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(
            storage.get_blob("pending_ops").unwrap().as_deref(),
            Some(r#"["op"]"#)
        );
        assert_eq!(storage.get_snapshot("sess_1").unwrap().as_deref(), Some("{}"));
    }
}
