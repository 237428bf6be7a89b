//! Position attempt model.
//!
//! A [`PositionAttempt`] holds the attempt/make counters for one court
//! position within a session. Attempts are created as a batch when the
//! session is created; afterwards only `makes` changes, and rows are
//! deleted only together with the whole session.

use serde::{Deserialize, Serialize};

use crate::model::Session;

/// Per-position counters within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionAttempt {
    /// Unique identifier, minted locally alongside the session.
    pub id: String,

    /// Owning session.
    pub session_id: String,

    /// Court position key (e.g. "left_corner", "top_of_key").
    pub position: String,

    /// Shot type tag (e.g. "catch_and_shoot", "off_dribble").
    pub shot_type: String,

    /// Target attempt count for this position.
    pub target_attempts: u32,

    /// Attempts taken so far.
    pub attempts: u32,

    /// Makes so far. The screen layer enforces `makes <= attempts`
    /// before persistence; the core does not re-validate.
    pub makes: u32,

    /// Display/processing order within the session.
    pub order_index: u32,
}

/// Template for one position in a session's attempt batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSpec {
    /// Court position key.
    pub position: String,
    /// Shot type tag.
    pub shot_type: String,
}

impl PositionSpec {
    /// Convenience constructor.
    #[must_use]
    pub fn new(position: &str, shot_type: &str) -> Self {
        Self {
            position: position.to_string(),
            shot_type: shot_type.to_string(),
        }
    }
}

impl PositionAttempt {
    /// Build the attempt batch for a freshly created session.
    ///
    /// Order indexes follow the position list order (0..n); every row
    /// starts at zero attempts and zero makes with the session's default
    /// target.
    #[must_use]
    pub fn batch_for(session: &Session, specs: &[PositionSpec]) -> Vec<Self> {
        specs
            .iter()
            .enumerate()
            .map(|(i, spec)| Self {
                id: format!("pa_{}", &uuid::Uuid::new_v4().simple().to_string()[..12]),
                session_id: session.id.clone(),
                position: spec.position.clone(),
                shot_type: spec.shot_type.clone(),
                target_attempts: session.target_attempts,
                attempts: 0,
                makes: 0,
                order_index: u32::try_from(i).unwrap_or(u32::MAX),
            })
            .collect()
    }
}
