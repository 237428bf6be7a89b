//! Remote store interface.
//!
//! Abstract contract over the hosted backend, not a wire format. Every
//! mutation here MUST be idempotent from the remote store's point of view
//! (upsert-by-id for creates, unconditional field-set for updates): the
//! drain engine is at-least-once, and a crash between a remote success
//! and the queue rewrite redelivers the op on the next drain.
//!
//! The upserts must also accept and preserve locally minted identifiers —
//! a session created offline keeps its id forever.

use thiserror::Error;

use crate::model::{PositionAttempt, Session};

/// Errors from the remote store.
///
/// These never cross the drain boundary: the engine isolates them per op
/// and retains failed ops for the next pass.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote rejected {entity} {id}: {message}")]
    Rejected {
        entity: &'static str,
        id: String,
        message: String,
    },
}

/// Result type for remote operations.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// The hosted backend, as the sync core sees it.
pub trait RemoteStore: Send + Sync {
    /// Idempotent create-or-replace of a session by its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    fn upsert_session(&self, session: &Session) -> RemoteResult<()>;

    /// Idempotent create-or-replace of attempt rows by their identifiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    fn upsert_position_attempts(&self, attempts: &[PositionAttempt]) -> RemoteResult<()>;

    /// Unconditional makes-count set; last write wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    fn set_position_attempt_makes(&self, position_attempt_id: &str, makes: u32)
    -> RemoteResult<()>;

    /// Unconditional status/timestamp set on a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    fn set_session_finished(&self, session_id: &str, finished_at: i64) -> RemoteResult<()>;

    /// Unconditional status set on a workout.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    fn set_workout_finished(&self, workout_id: &str) -> RemoteResult<()>;

    /// Fetch the remote copy of a session, `None` if it does not exist.
    ///
    /// Used by the workflow's remote-first read path; the drain engine
    /// never reads.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    fn fetch_session(
        &self,
        session_id: &str,
    ) -> RemoteResult<Option<(Session, Vec<PositionAttempt>)>>;
}
