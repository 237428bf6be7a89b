//! Operation Queue.
//!
//! An ordered, persisted list of pending mutation intents ([`Op`]) that
//! have not yet been confirmed by the remote store. The queue is
//! process-wide durable state: loaded once at startup, persisted as one
//! JSON blob under a fixed key on every mutation, and it survives process
//! restarts. It shrinks to empty as ops are successfully drained.
//!
//! Deduplication rules (applied on enqueue, exhaustively per kind):
//! - `UpdateSpotMakes` — at most one entry per attempt id; a new enqueue
//!   replaces the existing entry in its original slot (last writer wins).
//! - `FinishSession` / `FinishWorkout` — at most one entry per target id;
//!   a duplicate enqueue is a no-op.
//! - `CreateSession` — never deduplicated (one per session by
//!   construction).
//!
//! Cross-kind causal order is the caller's job (`CreateSession` enqueued
//! before ops referencing the session) and is preserved here: dedup is
//! the only case where insertion order is not queue position order.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::{self, SharedStorage};
use crate::sync::Op;

/// Fixed storage key under which the queue blob lives.
pub const QUEUE_STATE_KEY: &str = "pending_ops";

/// Where an enqueued op lands after dedup.
enum Placement {
    Append,
    Replace(usize),
    Skip,
}

/// Durable queue of pending ops.
#[derive(Debug)]
pub struct OpQueue {
    storage: SharedStorage,
    ops: Mutex<Vec<Op>>,
}

impl OpQueue {
    /// Load the persisted queue, once, at process start.
    ///
    /// A missing, unreadable, or malformed blob degrades to an empty
    /// queue with a warning — a corrupt local cache must never prevent
    /// startup.
    #[must_use]
    pub fn load(storage: SharedStorage) -> Self {
        let ops = match storage::lock(&storage).get_blob(QUEUE_STATE_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Op>>(&blob) {
                Ok(ops) => {
                    debug!(pending = ops.len(), "Loaded pending operation queue");
                    ops
                }
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable operation queue");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read operation queue, starting empty");
                Vec::new()
            }
        };

        Self {
            storage,
            ops: Mutex::new(ops),
        }
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Op>> {
        self.ops.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, ops: &[Op]) -> Result<()> {
        let blob = serde_json::to_string(ops)?;
        storage::lock(&self.storage).put_blob(QUEUE_STATE_KEY, &blob)
    }

    /// Append an op after applying its kind's deduplication rule.
    ///
    /// The full queue is persisted synchronously before the in-memory
    /// state is committed: on persistence failure both stay at the prior
    /// state and the error propagates, so an enqueued op is never
    /// silently lost.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn enqueue(&self, op: Op) -> Result<()> {
        let mut ops = self.guard();

        let placement = match &op {
            Op::CreateSession { .. } => Placement::Append,
            Op::UpdateSpotMakes {
                position_attempt_id,
                ..
            } => ops
                .iter()
                .position(|e| {
                    matches!(e, Op::UpdateSpotMakes { position_attempt_id: existing, .. }
                        if existing == position_attempt_id)
                })
                .map_or(Placement::Append, Placement::Replace),
            Op::FinishSession { session_id, .. } => {
                let dup = ops.iter().any(|e| {
                    matches!(e, Op::FinishSession { session_id: existing, .. }
                        if existing == session_id)
                });
                if dup { Placement::Skip } else { Placement::Append }
            }
            Op::FinishWorkout { workout_id } => {
                let dup = ops.iter().any(|e| {
                    matches!(e, Op::FinishWorkout { workout_id: existing }
                        if existing == workout_id)
                });
                if dup { Placement::Skip } else { Placement::Append }
            }
        };

        let mut next = ops.clone();
        match placement {
            Placement::Append => next.push(op),
            Placement::Replace(i) => next[i] = op,
            Placement::Skip => {
                debug!(kind = op.kind(), "Duplicate finish op, enqueue is a no-op");
                return Ok(());
            }
        }

        self.persist(&next)?;
        *ops = next;
        Ok(())
    }

    /// Current queue, oldest-first, without mutating it.
    #[must_use]
    pub fn read_all(&self) -> Vec<Op> {
        self.guard().clone()
    }

    /// Length of the current queue. Cheap and synchronous — this backs
    /// the UI's "N pending" indicator.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.guard().len()
    }

    /// Atomically overwrite the queue (drain bookkeeping).
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails; the in-memory queue is left
    /// unchanged in that case.
    pub fn replace_with(&self, replacement: Vec<Op>) -> Result<()> {
        let mut ops = self.guard();
        self.persist(&replacement)?;
        *ops = replacement;
        Ok(())
    }
}
