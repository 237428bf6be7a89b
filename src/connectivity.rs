//! Connectivity signal and reconnect-triggered drain.
//!
//! The core does not detect the network itself; the platform shell feeds
//! [`Connectivity`] transitions into a [`ReconnectWatcher`], which fires
//! one drain per reconnect — per transition, not per connectivity check.
//!
//! `Unknown` means "do not assume connectivity": writes take the offline
//! path, and no drain is triggered while in it. Leaving `Unknown` for
//! `Online` does count as a reconnect, since the device was not known to
//! be online before.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::error::Result;
use crate::sync::{DrainReport, Drainer};

/// Tri-state network signal from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// The device has a usable link.
    Online,
    /// The device is known to be disconnected.
    Offline,
    /// The platform cannot tell yet (startup, captive portal, ...).
    #[default]
    Unknown,
}

impl Connectivity {
    /// Whether the link is known-usable.
    #[must_use]
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }

    /// Whether session-mutating actions should take the offline path.
    ///
    /// True for both `Offline` and `Unknown`.
    #[must_use]
    pub const fn should_defer_writes(self) -> bool {
        !self.is_online()
    }
}

/// Fires one drain per not-online → online transition.
pub struct ReconnectWatcher {
    drainer: Arc<Drainer>,
    last: Mutex<Connectivity>,
}

impl ReconnectWatcher {
    /// Create a watcher; the initial state is `Unknown`.
    #[must_use]
    pub fn new(drainer: Arc<Drainer>) -> Self {
        Self {
            drainer,
            last: Mutex::new(Connectivity::Unknown),
        }
    }

    /// The last observed connectivity state.
    #[must_use]
    pub fn current(&self) -> Connectivity {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Feed a connectivity observation.
    ///
    /// Returns the drain report when this observation completed a
    /// reconnect transition, `None` otherwise (including repeated
    /// `Online` observations).
    ///
    /// # Errors
    ///
    /// Propagates a drain failure; the transition still counts as
    /// consumed, so the next trigger is the next reconnect (or an
    /// explicit [`Drainer::drain`] call).
    pub fn observe(&self, next: Connectivity) -> Result<Option<DrainReport>> {
        let previous = {
            let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *last, next)
        };

        if next.is_online() && !previous.is_online() {
            debug!(?previous, "Reconnected, draining queue");
            return self.drainer.drain().map(Some);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PositionAttempt, PositionSpec, Session};
    use crate::queue::OpQueue;
    use crate::remote::RemoteStore;
    use crate::remote::mock::MockRemote;
    use crate::storage::{self, SqliteStorage};
    use crate::store::SessionStore;
    use crate::sync::Op;

    fn watcher_with_one_pending() -> (ReconnectWatcher, Arc<OpQueue>, Arc<MockRemote>) {
        let shared = storage::shared(SqliteStorage::open_memory().unwrap());
        let queue = Arc::new(OpQueue::load(shared.clone()));
        let store = SessionStore::new(shared);
        let remote = Arc::new(MockRemote::new());

        let session = Session::new("u", "k", "t", 10);
        let attempts = PositionAttempt::batch_for(&session, &[PositionSpec::new("lc", "cs")]);
        queue
            .enqueue(Op::CreateSession {
                session,
                position_attempts: attempts,
            })
            .unwrap();

        let drainer = Arc::new(Drainer::new(
            queue.clone(),
            store,
            remote.clone() as Arc<dyn RemoteStore>,
        ));
        (ReconnectWatcher::new(drainer), queue, remote)
    }

    #[test]
    fn test_defer_writes() {
        assert!(!Connectivity::Online.should_defer_writes());
        assert!(Connectivity::Offline.should_defer_writes());
        assert!(Connectivity::Unknown.should_defer_writes());
    }

    #[test]
    fn test_offline_to_online_drains_once() {
        let (watcher, queue, _) = watcher_with_one_pending();

        watcher.observe(Connectivity::Offline).unwrap();
        let report = watcher.observe(Connectivity::Online).unwrap().unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_repeated_online_checks_do_not_redrain() {
        let (watcher, queue, remote) = watcher_with_one_pending();

        watcher.observe(Connectivity::Offline).unwrap();
        assert!(watcher.observe(Connectivity::Online).unwrap().is_some());
        let calls_after_drain = remote.call_count();

        // Periodic connectivity checks while staying online
        assert!(watcher.observe(Connectivity::Online).unwrap().is_none());
        assert!(watcher.observe(Connectivity::Online).unwrap().is_none());

        assert_eq!(remote.call_count(), calls_after_drain);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_unknown_to_online_counts_as_reconnect() {
        let (watcher, _, _) = watcher_with_one_pending();

        // Initial state is Unknown
        let report = watcher.observe(Connectivity::Online).unwrap();
        assert!(report.is_some());
    }

    #[test]
    fn test_going_offline_never_drains() {
        let (watcher, queue, remote) = watcher_with_one_pending();

        watcher.observe(Connectivity::Offline).unwrap();
        watcher.observe(Connectivity::Unknown).unwrap();
        watcher.observe(Connectivity::Offline).unwrap();

        assert_eq!(remote.call_count(), 0);
        assert_eq!(queue.pending_count(), 1);
    }

    #[test]
    fn test_each_reconnect_drains_again() {
        let (watcher, queue, _) = watcher_with_one_pending();

        watcher.observe(Connectivity::Online).unwrap();
        watcher.observe(Connectivity::Offline).unwrap();

        queue
            .enqueue(Op::FinishWorkout {
                workout_id: "wk_1".to_string(),
            })
            .unwrap();

        let report = watcher.observe(Connectivity::Online).unwrap().unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(queue.pending_count(), 0);
    }
}
