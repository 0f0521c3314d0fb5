//! Environment-driven configuration.
//!
//! Two knobs, both optional:
//! - `OUTBOX_DATA_DIR`: data directory (default `~/.outbox`); holds the
//!   SQLite database and the per-session channel auth profiles.
//! - `OUTBOX_DATABASE_URL`: overrides the database location entirely.

use std::path::{Path, PathBuf};

/// Resolve the data directory from `OUTBOX_DATA_DIR`, falling back to
/// `~/.outbox` (or `./.outbox` when no home directory is known).
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("OUTBOX_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".outbox")
}

/// Database URL: `OUTBOX_DATABASE_URL` if set, otherwise `outbox.db` inside
/// the data directory (`mode=rwc` so the file is created on first run).
pub fn database_url(data_dir: &Path) -> String {
    std::env::var("OUTBOX_DATABASE_URL").unwrap_or_else(|_| {
        format!("sqlite://{}?mode=rwc", data_dir.join("outbox.db").display())
    })
}

/// Channel credential/profile directory for one session id.
///
/// The transport stores its per-session authentication state here, keyed by
/// session id, so a restarted session reconnects without re-pairing.
pub fn session_auth_dir(data_dir: &Path, session_id: &str) -> PathBuf {
    data_dir.join("auth").join(session_id)
}
