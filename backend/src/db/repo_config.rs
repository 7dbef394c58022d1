//! Repository configuration file support.
//!
//! This module provides utilities for reading the database and query settings
//! from a TOML configuration file:
//!
//! ```toml
//! [sqlite]
//! database_path = "db/stpaul_crime.sqlite3"
//! max_connections = 1
//!
//! [query]
//! default_limit = 1000
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::config::SqliteConfig;
use super::query::{QueryDefaults, DEFAULT_LIMIT};
use super::repository::{ErrorContext, RepositoryError};

/// Candidate configuration files, in search order.
pub const DEFAULT_LOCATIONS: [&str; 3] = ["crime.toml", "backend/crime.toml", "../crime.toml"];

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub sqlite: SqliteSettings,
    #[serde(default)]
    pub query: QuerySettings,
}

/// SQLite connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteSettings {
    pub database_path: PathBuf,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    #[serde(default)]
    pub create_schema: bool,
}

/// List endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySettings {
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

fn default_max_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(
                format!("Failed to read config file: {}", e),
                ErrorContext::new("load_config").with_details(path.display().to_string()),
            )
        })?;

        Self::from_toml(&content)
    }

    /// Parse repository configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, RepositoryError> {
        let invalid = |message: String| {
            RepositoryError::configuration(message, ErrorContext::new("parse_config"))
        };

        let config: RepositoryConfig = toml::from_str(content)
            .map_err(|e| invalid(format!("Failed to parse config file: {}", e)))?;

        if config.sqlite.database_path.as_os_str().is_empty() {
            return Err(invalid("'sqlite.database_path' must not be empty".to_string()));
        }
        if config.sqlite.max_connections == 0 {
            return Err(invalid("'sqlite.max_connections' must be at least 1".to_string()));
        }

        Ok(config)
    }

    /// Load `crime.toml` from the first of [`DEFAULT_LOCATIONS`] that exists,
    /// relative to the working directory.
    ///
    /// # Returns
    /// * `Ok(None)` if no candidate file exists
    /// * `Err(RepositoryError)` if a file exists but cannot be used
    pub fn from_default_location() -> Result<Option<Self>, RepositoryError> {
        Self::discover_in(Path::new(""))
    }

    /// Same search as [`Self::from_default_location`], rooted at `base`.
    pub fn discover_in(base: &Path) -> Result<Option<Self>, RepositoryError> {
        match DEFAULT_LOCATIONS
            .iter()
            .map(|candidate| base.join(candidate))
            .find(|path| path.is_file())
        {
            Some(path) => Self::from_file(&path).map(Some),
            None => Ok(None),
        }
    }

    pub fn to_sqlite_config(&self) -> SqliteConfig {
        SqliteConfig {
            database_path: self.sqlite.database_path.clone(),
            max_pool_size: self.sqlite.max_connections,
            connection_timeout_sec: self.sqlite.connect_timeout,
            busy_timeout_ms: self.sqlite.busy_timeout_ms,
            create_schema: self.sqlite.create_schema,
        }
    }

    pub fn query_defaults(&self) -> QueryDefaults {
        QueryDefaults {
            default_limit: self.query.default_limit,
        }
    }
}
