//! Session model.
//!
//! A session is one instance of a user recording shot attempts across a
//! set of court positions. Sessions created while offline mint their
//! permanent identifier locally; the remote upsert preserves it.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a session.
///
/// Transitions monotonically: `InProgress` → `Done`, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Session is being recorded.
    InProgress,
    /// Session has been finished by the user.
    Done,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Done => write!(f, "DONE"),
        }
    }
}

/// A shot-tracking session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier, stable across local and remote representations.
    pub id: String,

    /// Owner of the session.
    pub user_id: String,

    /// Kind/category tag (e.g. "spot_shooting", "free_throws").
    pub kind: String,

    /// Display title.
    pub title: String,

    /// Default target attempt count per position.
    pub target_attempts: u32,

    /// Lifecycle status.
    pub status: SessionStatus,

    /// Start timestamp (Unix milliseconds).
    pub started_at: i64,

    /// Parent workout, when the session was started from one.
    pub workout_id: Option<String>,
}

impl Session {
    /// Create a new in-progress session with a locally minted identifier.
    ///
    /// The identifier is permanent: when the session syncs, the remote
    /// store upserts under this same id rather than assigning its own.
    #[must_use]
    pub fn new(user_id: &str, kind: &str, title: &str, target_attempts: u32) -> Self {
        let id = format!("sess_{}", &uuid::Uuid::new_v4().simple().to_string()[..12]);
        Self {
            id,
            user_id: user_id.to_string(),
            kind: kind.to_string(),
            title: title.to_string(),
            target_attempts,
            status: SessionStatus::InProgress,
            started_at: chrono::Utc::now().timestamp_millis(),
            workout_id: None,
        }
    }

    /// Attach a parent workout.
    #[must_use]
    pub fn with_workout(mut self, workout_id: &str) -> Self {
        self.workout_id = Some(workout_id.to_string());
        self
    }

    /// Whether the session is still being recorded.
    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        matches!(self.status, SessionStatus::InProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = Session::new("user_1", "spot_shooting", "Morning drill", 10);

        assert!(session.id.starts_with("sess_"));
        assert_eq!(session.user_id, "user_1");
        assert_eq!(session.status, SessionStatus::InProgress);
        assert!(session.is_in_progress());
        assert!(session.workout_id.is_none());
        assert!(session.started_at > 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Session::new("u", "k", "t", 10);
        let b = Session::new("u", "k", "t", 10);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_with_workout() {
        let session = Session::new("u", "k", "t", 10).with_workout("wk_1");
        assert_eq!(session.workout_id.as_deref(), Some("wk_1"));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&SessionStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        let json = serde_json::to_string(&SessionStatus::Done).unwrap();
        assert_eq!(json, "\"DONE\"");
    }
}
