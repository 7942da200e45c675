/// Runtime configuration for the reading tracker
///
/// Command line flags are turned into a `TrackerConfig` once at startup, so
/// the rest of the server never has to guess at identities or paths.

use std::path::PathBuf;

use crate::domain::Identity;

/// Directory name used under the user's home/data/config dirs
const APP_DIR: &str = "chronicle";

/// Database file name
const DB_FILE: &str = "chronicle.db";

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Path to the SQLite database file
    pub database: PathBuf,
    /// Identity whose settings are read and written
    pub identity: Identity,
}

impl TrackerConfig {
    pub fn new(database: PathBuf, identity: Identity) -> Self {
        Self { database, identity }
    }

    /// Configuration using the default identity
    pub fn with_database(database: PathBuf) -> Self {
        Self::new(database, Identity::default())
    }

    /// Configuration for the identity named on the command line
    ///
    /// A missing or blank name falls back to the default identity.
    pub fn for_identity(database: PathBuf, identity: Option<&str>) -> Self {
        let identity = Identity::resolve(identity, &Identity::default());
        Self::new(database, identity)
    }
}

/// Get the default database path with robust fallback strategy
pub fn default_database_path() -> std::io::Result<PathBuf> {
    // Try various locations in order of preference
    let potential_paths = [
        dirs::home_dir().map(|p| p.join(format!(".{}", APP_DIR))),
        dirs::data_dir().map(|p| p.join(APP_DIR)),
        dirs::config_dir().map(|p| p.join(APP_DIR)),
        std::env::current_dir().ok().map(|p| p.join(format!(".{}", APP_DIR))),
    ];

    for dir in potential_paths.iter().flatten() {
        if is_writable_dir(dir) {
            return Ok(dir.join(DB_FILE));
        }
    }

    // Ultimate fallback: use a temporary directory
    let temp_dir = std::env::temp_dir().join(APP_DIR);
    std::fs::create_dir_all(&temp_dir)?;

    tracing::warn!("Using temporary directory for database: {}", temp_dir.display());
    Ok(temp_dir.join(DB_FILE))
}

/// Create `dir` if needed and check a file can be written in it
fn is_writable_dir(dir: &PathBuf) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let marker = dir.join(".test_write");
    if std::fs::write(&marker, "test").is_ok() {
        let _ = std::fs::remove_file(&marker);
        true
    } else {
        false
    }
}

/// Make sure the database's parent directory exists
pub fn prepare_database_path(path: PathBuf) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(path)
}
