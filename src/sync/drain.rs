//! Drain/Replay Engine.
//!
//! Walks the operation queue front-to-back, applies each op to the remote
//! store, and rewrites the queue with only the ops that failed. Remote
//! calls are issued sequentially to preserve causal order
//! (`CreateSession` before anything referencing the session).
//!
//! Replay is best-effort, at-least-once: a crash between a remote success
//! and the queue rewrite redelivers that op on the next drain, which is
//! why every [`RemoteStore`] mutation must be idempotent.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::queue::OpQueue;
use crate::remote::{RemoteResult, RemoteStore};
use crate::store::SessionStore;
use crate::sync::types::{DrainReport, Op};

/// Replays pending ops against the remote store.
pub struct Drainer {
    queue: Arc<OpQueue>,
    store: SessionStore,
    remote: Arc<dyn RemoteStore>,
    // Single-flight: queue bookkeeping is not safe under concurrent
    // read-modify-write, even though the remote calls are idempotent.
    in_flight: Mutex<()>,
}

impl Drainer {
    /// Create a drainer over the queue, the local store, and the remote.
    #[must_use]
    pub fn new(queue: Arc<OpQueue>, store: SessionStore, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            queue,
            store,
            remote,
            in_flight: Mutex::new(()),
        }
    }

    /// Replay the full queue once, retaining only the ops that failed.
    ///
    /// A trigger that arrives while a drain is running queues behind it.
    /// An empty queue returns immediately without any remote calls.
    ///
    /// # Errors
    ///
    /// Returns an error only if the final queue rewrite fails; remote
    /// failures are isolated per op and reflected in the report instead.
    pub fn drain(&self) -> Result<DrainReport> {
        let _guard = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let ops = self.queue.read_all();
        if ops.is_empty() {
            return Ok(DrainReport::default());
        }
        debug!(pending = ops.len(), "Draining operation queue");

        let mut processed = 0;
        let mut failed = Vec::new();

        for op in ops {
            match self.apply(&op) {
                Ok(()) => {
                    processed += 1;
                    // The remote copy is authoritative now; the offline
                    // snapshot has served its purpose.
                    if let Op::CreateSession { session, .. } = &op {
                        if let Err(e) = self.store.delete(&session.id) {
                            warn!(session_id = %session.id, error = %e,
                                "Synced session but failed to drop local snapshot");
                        }
                    }
                }
                Err(e) => {
                    warn!(kind = op.kind(), error = %e, "Replay failed, op retained");
                    failed.push(op);
                }
            }
        }

        let pending = failed.len();
        self.queue.replace_with(failed)?;

        info!(processed, pending, "Drain complete");
        Ok(DrainReport { processed, pending })
    }

    /// Dispatch one op to its remote operation.
    fn apply(&self, op: &Op) -> RemoteResult<()> {
        match op {
            Op::CreateSession {
                session,
                position_attempts,
            } => {
                self.remote.upsert_session(session)?;
                self.remote.upsert_position_attempts(position_attempts)
            }
            Op::UpdateSpotMakes {
                position_attempt_id,
                makes,
            } => self
                .remote
                .set_position_attempt_makes(position_attempt_id, *makes),
            Op::FinishSession {
                session_id,
                finished_at,
            } => self.remote.set_session_finished(session_id, *finished_at),
            Op::FinishWorkout { workout_id } => self.remote.set_workout_finished(workout_id),
        }
    }
}
