//! Queue replay against the remote store.
//!
//! - **Types**: [`Op`], the closed set of pending mutation intents, and
//!   [`DrainReport`], the outcome of one replay pass
//! - **Drain**: [`Drainer`], the front-to-back replay engine
//!
//! # Architecture
//!
//! Offline writes land in the [`crate::queue::OpQueue`]; on reconnect the
//! drainer replays them in order, keeps only the failures queued, and
//! drops local snapshots whose sessions the remote store now owns.
//!
//! # Example
//!
//! ```ignore
//! use hooplog::sync::Drainer;
//!
//! let drainer = Drainer::new(queue, store, remote);
//! let report = drainer.drain()?;
//! println!("{} synced, {} still pending", report.processed, report.pending);
//! ```

mod drain;
mod types;

pub use drain::Drainer;
pub use types::{DrainReport, Op};
