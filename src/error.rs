//! Error types for the HoopLog sync core.
//!
//! One crate-wide [`Error`] enum with `#[from]` conversions for the
//! storage and serialization layers. Remote-store failures have their own
//! type ([`crate::remote::RemoteError`]) because the drain engine isolates
//! them per operation instead of propagating them.

use thiserror::Error;

/// Result type alias for sync-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the sync core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether retrying the same call later can reasonably succeed.
    ///
    /// Database busy/lock conditions and I/O are transient; a
    /// serialization failure or bad configuration is not.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Io(_))
    }
}
