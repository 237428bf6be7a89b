//! Session workflow: online/offline routing for user actions.
//!
//! This is the layer the screens call. Per action it inspects the
//! [`Connectivity`] signal: online writes go straight to the remote
//! store; offline (or unknown) writes go to the local session store plus
//! the operation queue. Reads try the remote store first and fall back to
//! the local snapshot.
//!
//! The store, queue, and remote are explicit injected values with
//! process-wide lifetimes — there is no ambient singleton, and every
//! caller that syncs carries the queue in its signature.
//!
//! A remote failure on the online path is logged and the action falls
//! back to the offline path, so a user's write is never lost to a flaky
//! link. Core errors (queue persistence in particular) still propagate.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::connectivity::Connectivity;
use crate::error::Result;
use crate::model::{PositionAttempt, PositionSpec, Session};
use crate::queue::OpQueue;
use crate::remote::RemoteStore;
use crate::store::{SessionSnapshot, SessionStore};
use crate::sync::Op;

/// Everything needed to start a session.
#[derive(Debug, Clone)]
pub struct SessionDraft {
    /// Owner of the session.
    pub user_id: String,
    /// Kind/category tag.
    pub kind: String,
    /// Display title.
    pub title: String,
    /// Default target attempt count per position.
    pub target_attempts: u32,
    /// Parent workout, when started from one.
    pub workout_id: Option<String>,
    /// Positions to drill, in display order.
    pub positions: Vec<PositionSpec>,
}

/// Routing layer between the screens, the local pair, and the remote.
pub struct SessionWorkflow {
    store: SessionStore,
    queue: Arc<OpQueue>,
    remote: Arc<dyn RemoteStore>,
}

impl SessionWorkflow {
    /// Create a workflow over the injected store, queue, and remote.
    #[must_use]
    pub fn new(store: SessionStore, queue: Arc<OpQueue>, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            queue,
            remote,
        }
    }

    /// Start a session: build it with a locally minted id and route the
    /// create to the remote store or the offline pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the offline persistence fails.
    pub fn start_session(
        &self,
        connectivity: Connectivity,
        draft: &SessionDraft,
    ) -> Result<SessionSnapshot> {
        let mut session = Session::new(
            &draft.user_id,
            &draft.kind,
            &draft.title,
            draft.target_attempts,
        );
        if let Some(workout_id) = &draft.workout_id {
            session = session.with_workout(workout_id);
        }
        let attempts = PositionAttempt::batch_for(&session, &draft.positions);

        if connectivity.is_online() {
            let result = self
                .remote
                .upsert_session(&session)
                .and_then(|()| self.remote.upsert_position_attempts(&attempts));
            match result {
                Ok(()) => {
                    debug!(session_id = %session.id, "Session created remotely");
                    return Ok(SessionSnapshot {
                        session,
                        position_attempts: attempts,
                    });
                }
                Err(e) => {
                    warn!(session_id = %session.id, error = %e,
                        "Remote create failed, falling back to offline path");
                }
            }
        }

        self.store.save(&session, &attempts)?;
        self.queue.enqueue(Op::CreateSession {
            session: session.clone(),
            position_attempts: attempts.clone(),
        })?;
        debug!(session_id = %session.id, "Session created offline");

        Ok(SessionSnapshot {
            session,
            position_attempts: attempts,
        })
    }

    /// Record the makes count for one position attempt.
    ///
    /// Offline, the snapshot update is best-effort (the queued op is the
    /// durable record); the enqueue itself must succeed.
    ///
    /// # Errors
    ///
    /// Returns an error if the offline enqueue fails.
    pub fn record_makes(
        &self,
        connectivity: Connectivity,
        session_id: &str,
        position_attempt_id: &str,
        makes: u32,
    ) -> Result<()> {
        if connectivity.is_online() {
            match self
                .remote
                .set_position_attempt_makes(position_attempt_id, makes)
            {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(position_attempt_id, error = %e,
                        "Remote makes update failed, falling back to offline path");
                }
            }
        }

        if let Err(e) = self.store.update_makes(session_id, position_attempt_id, makes) {
            warn!(session_id, error = %e, "Best-effort local makes update failed");
        }
        self.queue.enqueue(Op::UpdateSpotMakes {
            position_attempt_id: position_attempt_id.to_string(),
            makes,
        })
    }

    /// Finish a session, and its parent workout when there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the offline enqueue fails.
    pub fn finish_session(
        &self,
        connectivity: Connectivity,
        session_id: &str,
        workout_id: Option<&str>,
    ) -> Result<()> {
        let finished_at = chrono::Utc::now().timestamp_millis();

        if connectivity.is_online() {
            let result = self
                .remote
                .set_session_finished(session_id, finished_at)
                .and_then(|()| match workout_id {
                    Some(id) => self.remote.set_workout_finished(id),
                    None => Ok(()),
                });
            match result {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(session_id, error = %e,
                        "Remote finish failed, falling back to offline path");
                }
            }
        }

        if let Err(e) = self.store.finish(session_id) {
            warn!(session_id, error = %e, "Best-effort local finish failed");
        }
        self.queue.enqueue(Op::FinishSession {
            session_id: session_id.to_string(),
            finished_at,
        })?;
        if let Some(id) = workout_id {
            self.queue.enqueue(Op::FinishWorkout {
                workout_id: id.to_string(),
            })?;
        }
        Ok(())
    }

    /// Load a session for display: remote first, local snapshot as the
    /// fallback on failure or empty result.
    ///
    /// In fallback mode a local read failure degrades to `None` — the
    /// screen shows "no data" rather than an error for a cache miss.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice; kept fallible so callers handle
    /// the store uniformly with the write paths.
    pub fn load_session(&self, session_id: &str) -> Result<Option<SessionSnapshot>> {
        match self.remote.fetch_session(session_id) {
            Ok(Some((session, position_attempts))) => {
                return Ok(Some(SessionSnapshot {
                    session,
                    position_attempts,
                }));
            }
            Ok(None) => debug!(session_id, "No remote copy, trying local snapshot"),
            Err(e) => debug!(session_id, error = %e, "Remote fetch failed, trying local snapshot"),
        }

        match self.store.load(session_id) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                warn!(session_id, error = %e, "Fallback snapshot read failed");
                Ok(None)
            }
        }
    }

    /// Number of ops awaiting sync, for the "N pending" indicator.
    /// Synchronous and cheap; no network call.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.pending_count()
    }
}
