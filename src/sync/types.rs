//! Queue entry and drain report types.
//!
//! [`Op`] is the closed set of pending mutation intents. It is a tagged
//! union on the wire, discriminated by the `op` field:
//! `{"op":"update_spot_makes","position_attempt_id":"pa_1","makes":7}`
//!
//! Every dispatch site (enqueue dedup, drain dispatch) matches
//! exhaustively, so adding a fifth kind is a compile-time-checked change.

use serde::{Deserialize, Serialize};

use crate::model::{PositionAttempt, Session};

/// A single queued, not-yet-confirmed mutation intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Materialize a full session atomically on the remote store.
    CreateSession {
        /// Session header.
        session: Session,
        /// The session's attempt batch.
        position_attempts: Vec<PositionAttempt>,
    },
    /// Set the makes count of one position attempt.
    UpdateSpotMakes {
        /// Target attempt row.
        position_attempt_id: String,
        /// New makes count (last writer wins).
        makes: u32,
    },
    /// Mark a session done.
    FinishSession {
        /// Target session.
        session_id: String,
        /// Finish timestamp (Unix milliseconds).
        finished_at: i64,
    },
    /// Mark a parent workout done.
    FinishWorkout {
        /// Target workout.
        workout_id: String,
    },
}

impl Op {
    /// Short kind name for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CreateSession { .. } => "create_session",
            Self::UpdateSpotMakes { .. } => "update_spot_makes",
            Self::FinishSession { .. } => "finish_session",
            Self::FinishWorkout { .. } => "finish_workout",
        }
    }
}

/// Outcome of one drain pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Number of ops the remote store confirmed this pass.
    pub processed: usize,
    /// Number of ops that failed and remain queued.
    pub pending: usize,
}

impl DrainReport {
    /// Returns true if nothing remains queued.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.pending == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_wire_format() {
        let op = Op::UpdateSpotMakes {
            position_attempt_id: "pa_1".to_string(),
            makes: 7,
        };
        let json = serde_json::to_string(&op).unwrap();
        assert!(json.contains(r#""op":"update_spot_makes""#));

        let back: Op = serde_json::from_str(&json).unwrap();
        assert_eq!(back, op);
    }

    #[test]
    fn test_op_kind() {
        let op = Op::FinishWorkout {
            workout_id: "wk_1".to_string(),
        };
        assert_eq!(op.kind(), "finish_workout");
    }

    #[test]
    fn test_drain_report() {
        let report = DrainReport {
            processed: 3,
            pending: 0,
        };
        assert!(report.is_clean());

        let report = DrainReport {
            processed: 1,
            pending: 2,
        };
        assert!(!report.is_clean());
    }
}
