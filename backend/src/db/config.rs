//! Database configuration and environment variable handling.

use std::env;
use std::path::PathBuf;

/// Path value that opens a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Configuration for the SQLite database file and its connection pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
    /// Path of the database file
    pub database_path: PathBuf,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Seconds to wait for a free connection
    pub connection_timeout_sec: u64,
    /// Milliseconds SQLite waits on a locked database before failing
    pub busy_timeout_ms: u64,
    /// Create missing tables from the bundled schema on startup
    pub create_schema: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::new(),
            max_pool_size: 1,
            connection_timeout_sec: 30,
            busy_timeout_ms: 5000,
            create_schema: false,
        }
    }
}

impl SqliteConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_PATH` or `CRIME_DB_PATH`: Database file (required)
    /// - `SQLITE_POOL_MAX`: Maximum pool size (default: 1)
    /// - `SQLITE_CONN_TIMEOUT_SEC`: Connection checkout timeout in seconds (default: 30)
    /// - `SQLITE_BUSY_TIMEOUT_MS`: SQLite busy timeout in milliseconds (default: 5000)
    /// - `SQLITE_CREATE_SCHEMA`: Create missing tables on startup (default: false)
    ///
    /// # Errors
    /// Returns an error if the database path is not set.
    pub fn from_env() -> Result<Self, String> {
        let database_path = env::var("DATABASE_PATH")
            .or_else(|_| env::var("CRIME_DB_PATH"))
            .map_err(|_| "DATABASE_PATH or CRIME_DB_PATH must be set".to_string())?;

        let defaults = Self::default();

        let max_pool_size = env::var("SQLITE_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.max_pool_size);

        let connection_timeout_sec = env::var("SQLITE_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.connection_timeout_sec);

        let busy_timeout_ms = env::var("SQLITE_BUSY_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.busy_timeout_ms);

        let create_schema = env::var("SQLITE_CREATE_SCHEMA")
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.create_schema);

        Ok(Self {
            database_path: PathBuf::from(database_path),
            max_pool_size,
            connection_timeout_sec,
            busy_timeout_ms,
            create_schema,
        })
    }

    /// Create a new configuration for a database path.
    pub fn with_path(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Default::default()
        }
    }

    /// Enable or disable schema creation.
    pub fn create_schema(mut self, create: bool) -> Self {
        self.create_schema = create;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
