//! Data models for the sync core.
//!
//! - [`Session`] / [`SessionStatus`] — one recorded training session
//! - [`PositionAttempt`] — per-position attempt/make counters
//! - [`PositionSpec`] — template used to build the attempt batch

pub mod attempt;
pub mod session;

pub use attempt::{PositionAttempt, PositionSpec};
pub use session::{Session, SessionStatus};
