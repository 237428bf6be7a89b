//! HoopLog sync core — offline-first session synchronization.
//!
//! The durable heart of the HoopLog shot tracker: lets a user start,
//! record, and finish a training session with no network, then replays
//! the queued writes against the remote store on reconnect without
//! duplicating records or losing updates.
//!
//! # Architecture
//!
//! - [`model`] - Data types (Session, PositionAttempt)
//! - [`storage`] - SQLite persistence layer
//! - [`store`] - Local Session Store (offline snapshots)
//! - [`queue`] - Operation Queue (pending mutation intents, deduplicated)
//! - [`remote`] - Remote store trait boundary
//! - [`sync`] - Drain/replay engine
//! - [`connectivity`] - Network signal and reconnect-triggered drain
//! - [`workflow`] - Online/offline routing for user actions
//! - [`config`] - Database path resolution
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hooplog::connectivity::{Connectivity, ReconnectWatcher};
//! use hooplog::queue::OpQueue;
//! use hooplog::storage::{self, SqliteStorage};
//! use hooplog::store::SessionStore;
//! use hooplog::sync::Drainer;
//!
//! # fn run(remote: Arc<dyn hooplog::remote::RemoteStore>) -> hooplog::Result<()> {
//! let db_path = hooplog::config::resolve_db_path(None)?;
//! let shared = storage::shared(SqliteStorage::open(&db_path)?);
//!
//! let queue = Arc::new(OpQueue::load(shared.clone()));
//! let store = SessionStore::new(shared);
//! let drainer = Arc::new(Drainer::new(queue.clone(), store, remote));
//!
//! let watcher = ReconnectWatcher::new(drainer);
//! if let Some(report) = watcher.observe(Connectivity::Online)? {
//!     println!("{} ops synced", report.processed);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod connectivity;
pub mod error;
pub mod model;
pub mod queue;
pub mod remote;
pub mod storage;
pub mod store;
pub mod sync;
pub mod workflow;

pub use error::{Error, Result};
