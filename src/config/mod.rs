//! Configuration management.
//!
//! Resolves where the local sync database lives. The database is a single
//! per-device file; the mobile shell usually passes an explicit path into
//! its sandboxed storage directory, while tools and tests rely on the
//! resolution chain below.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Get the global HoopLog data directory (`~/.hooplog`).
#[must_use]
pub fn global_hooplog_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".hooplog"))
}

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `HOOPLOG_TEST_DB=1` (or any truthy
/// value) and redirects all storage to an isolated test database.
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var("HOOPLOG_TEST_DB")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false)
}

/// Get the test database path (`~/.hooplog/test/hooplog.db`).
#[must_use]
pub fn test_db_path() -> Option<PathBuf> {
    global_hooplog_dir().map(|dir| dir.join("test").join("hooplog.db"))
}

/// Resolve the database path.
///
/// Priority:
/// 1. Explicit path from the embedding application
/// 2. `HOOPLOG_TEST_DB` set → isolated test database
/// 3. `HOOPLOG_DB` environment variable
/// 4. Global location: `~/.hooplog/data/hooplog.db`
///
/// # Errors
///
/// Returns [`Error::Config`] if no home directory can be determined.
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(path.to_path_buf());
    }

    if is_test_mode() {
        return test_db_path()
            .ok_or_else(|| Error::Config("no home directory for test database".to_string()));
    }

    if let Ok(db_path) = std::env::var("HOOPLOG_DB") {
        if !db_path.trim().is_empty() {
            return Ok(PathBuf::from(db_path));
        }
    }

    global_hooplog_dir()
        .map(|dir| dir.join("data").join("hooplog.db"))
        .ok_or_else(|| Error::Config("no home directory for database".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_db_path_with_explicit() {
        let explicit = PathBuf::from("/custom/path/db.sqlite");
        let result = resolve_db_path(Some(&explicit)).unwrap();
        assert_eq!(result, explicit);
    }

    #[test]
    fn test_global_dir_returns_some() {
        assert!(global_hooplog_dir().is_some());
    }

    #[test]
    fn test_test_db_path_is_separate() {
        let global = global_hooplog_dir().unwrap();
        let test = test_db_path().unwrap();

        assert!(test.to_string_lossy().contains("/test/"));
        assert!(test.ends_with("hooplog.db"));
        assert_ne!(global.join("data").join("hooplog.db"), test);
    }
}
