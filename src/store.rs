//! Local Session Store.
//!
//! Persists one denormalized snapshot (session header + ordered attempt
//! rows) per session id, so a session started offline can be read back on
//! screen load before it ever reaches the remote store. Pure key-value
//! persistence; queuing logic lives in [`crate::queue`].
//!
//! Mutating calls (`update_makes`, `finish`) are best-effort: callers
//! always also enqueue the durable op, so a missing local copy is a no-op
//! rather than an error.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::model::{PositionAttempt, Session, SessionStatus};
use crate::storage::{self, SharedStorage};

/// The full offline copy of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session header.
    pub session: Session,
    /// Ordered attempt rows, owned exclusively by the session.
    pub position_attempts: Vec<PositionAttempt>,
}

/// Keyed store of offline session snapshots.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: SharedStorage,
}

impl SessionStore {
    /// Create a store over the shared storage backend.
    #[must_use]
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    /// Persist the snapshot under the session's id, fully overwriting any
    /// prior value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, session: &Session, position_attempts: &[PositionAttempt]) -> Result<()> {
        let snapshot = SessionSnapshot {
            session: session.clone(),
            position_attempts: position_attempts.to_vec(),
        };
        let payload = serde_json::to_string(&snapshot)?;
        storage::lock(&self.storage).put_snapshot(&session.id, &payload)?;
        Ok(())
    }

    /// Load the snapshot for a session.
    ///
    /// `None` means "no offline copy exists" — the canonical copy may
    /// live remotely, so callers must not treat it as an error. A payload
    /// that no longer parses degrades to `None` with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the database read fails; callers using this as
    /// a fallback path may treat that as not-found too.
    pub fn load(&self, session_id: &str) -> Result<Option<SessionSnapshot>> {
        let Some(payload) = storage::lock(&self.storage).get_snapshot(session_id)? else {
            return Ok(None);
        };

        match serde_json::from_str(&payload) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(session_id, error = %e, "Discarding unreadable session snapshot");
                Ok(None)
            }
        }
    }

    /// Set the `makes` count of one position attempt and re-persist.
    ///
    /// No-op when the session has no local copy or the attempt id does
    /// not match any row.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or re-persist fails.
    pub fn update_makes(
        &self,
        session_id: &str,
        position_attempt_id: &str,
        makes: u32,
    ) -> Result<()> {
        let Some(mut snapshot) = self.load(session_id)? else {
            return Ok(());
        };

        let Some(attempt) = snapshot
            .position_attempts
            .iter_mut()
            .find(|a| a.id == position_attempt_id)
        else {
            return Ok(());
        };
        attempt.makes = makes;

        self.save(&snapshot.session, &snapshot.position_attempts)
    }

    /// Mark the session done and re-persist. No-op when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or re-persist fails.
    pub fn finish(&self, session_id: &str) -> Result<()> {
        let Some(mut snapshot) = self.load(session_id)? else {
            return Ok(());
        };

        snapshot.session.status = SessionStatus::Done;
        self.save(&snapshot.session, &snapshot.position_attempts)
    }

    /// Remove the snapshot entirely. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&self, session_id: &str) -> Result<()> {
        storage::lock(&self.storage).delete_snapshot(session_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PositionSpec;
    use crate::storage::SqliteStorage;

    fn test_store() -> SessionStore {
        SessionStore::new(storage::shared(SqliteStorage::open_memory().unwrap()))
    }

    fn make_session() -> (Session, Vec<PositionAttempt>) {
        let session = Session::new("user_1", "spot_shooting", "Drill", 10);
        let attempts = PositionAttempt::batch_for(
            &session,
            &[
                PositionSpec::new("left_corner", "catch_and_shoot"),
                PositionSpec::new("top_of_key", "catch_and_shoot"),
            ],
        );
        (session, attempts)
    }

    #[test]
    fn test_save_load_roundtrip() {
        let store = test_store();
        let (session, attempts) = make_session();

        store.save(&session, &attempts).unwrap();

        let snapshot = store.load(&session.id).unwrap().unwrap();
        assert_eq!(snapshot.session, session);
        assert_eq!(snapshot.position_attempts, attempts);
    }

    #[test]
    fn test_load_absent_is_none() {
        let store = test_store();
        assert!(store.load("sess_missing").unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let store = test_store();
        let (mut session, attempts) = make_session();

        store.save(&session, &attempts).unwrap();
        session.title = "Renamed".to_string();
        store.save(&session, &attempts).unwrap();

        let snapshot = store.load(&session.id).unwrap().unwrap();
        assert_eq!(snapshot.session.title, "Renamed");
    }

    #[test]
    fn test_update_makes() {
        let store = test_store();
        let (session, attempts) = make_session();
        store.save(&session, &attempts).unwrap();

        store.update_makes(&session.id, &attempts[1].id, 7).unwrap();

        let snapshot = store.load(&session.id).unwrap().unwrap();
        assert_eq!(snapshot.position_attempts[0].makes, 0);
        assert_eq!(snapshot.position_attempts[1].makes, 7);
    }

    #[test]
    fn test_update_makes_absent_session_is_noop() {
        let store = test_store();
        store.update_makes("sess_missing", "pa_1", 3).unwrap();
    }

    #[test]
    fn test_update_makes_unknown_attempt_is_noop() {
        let store = test_store();
        let (session, attempts) = make_session();
        store.save(&session, &attempts).unwrap();

        store.update_makes(&session.id, "pa_unknown", 3).unwrap();

        let snapshot = store.load(&session.id).unwrap().unwrap();
        assert!(snapshot.position_attempts.iter().all(|a| a.makes == 0));
    }

    #[test]
    fn test_finish() {
        let store = test_store();
        let (session, attempts) = make_session();
        store.save(&session, &attempts).unwrap();

        store.finish(&session.id).unwrap();

        let snapshot = store.load(&session.id).unwrap().unwrap();
        assert_eq!(snapshot.session.status, SessionStatus::Done);
    }

    #[test]
    fn test_finish_absent_is_noop() {
        let store = test_store();
        store.finish("sess_missing").unwrap();
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = test_store();
        let (session, attempts) = make_session();
        store.save(&session, &attempts).unwrap();

        store.delete(&session.id).unwrap();
        assert!(store.load(&session.id).unwrap().is_none());

        store.delete(&session.id).unwrap();
    }

    #[test]
    fn test_corrupt_payload_degrades_to_none() {
        let shared = storage::shared(SqliteStorage::open_memory().unwrap());
        let store = SessionStore::new(shared.clone());

        storage::lock(&shared)
            .put_snapshot("sess_1", "not json at all")
            .unwrap();

        assert!(store.load("sess_1").unwrap().is_none());
    }
}
