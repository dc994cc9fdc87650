//! Runtime configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first, so values there
//! act as defaults for variables not already set.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable holding the database file path.
pub const DATABASE_VAR: &str = "NOTEFUL_DATABASE";

/// Environment variable holding the log filter directive.
pub const LOG_VAR: &str = "NOTEFUL_LOG";

const DEFAULT_LOG_FILTER: &str = "noteful=warn";

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl Config {
    /// Loads `.env`, then resolves the configuration from the process
    /// environment.
    ///
    /// # Environment Variables
    ///
    /// - `NOTEFUL_DATABASE`: database path (default `{data_dir}/noteful/noteful.db`)
    /// - `NOTEFUL_LOG`: log filter, falling back to `RUST_LOG`, then `noteful=warn`
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration through `lookup` instead of the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_path = match lookup(DATABASE_VAR).filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let log_filter = lookup(LOG_VAR)
            .or_else(|| lookup("RUST_LOG"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            database_path,
            log_filter,
        })
    }

    /// Replaces the database path, e.g. from a command-line flag.
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }
}

/// Gets the cross-platform database path.
///
/// Returns the path as `{data_dir}/noteful/noteful.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
pub fn default_database_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("noteful").join("noteful.db"))
}

/// Ensures the parent directory of the database file exists.
///
/// Creates the directory structure if it doesn't exist using `create_dir_all`.
pub fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }
    Ok(())
}
