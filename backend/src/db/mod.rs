//! Database module for the crime dataset.
//!
//! # Architecture
//!
//! The database module follows a layered architecture:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (HTTP handlers)                      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Filter parsing and body validation                   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  SqliteRepository (repositories/sqlite)                 │
//! │  - Binds and runs statements from query/                │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The module includes:
//! - `services`: High-level functions called by the handlers
//! - `query`: Filter types and the SQL statement builder
//! - `repository`: Trait definition and error types
//! - `repositories::sqlite`: SQLite implementation with Diesel
//! - `config` / `repo_config`: environment and TOML configuration
//!
//! # Recommended Usage
//!
//! ```ignore
//! use stpaul_crime::db::{services, SqliteConfig, SqliteRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = SqliteRepository::new(SqliteConfig::from_env()?)?;
//!     let params = std::collections::HashMap::new();
//!     let codes = services::list_codes(&repo, &params).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(feature = "sqlite-repo"))]
compile_error!("The sqlite-repo feature is required.");

pub mod config;
pub mod query;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use config::SqliteConfig;
pub use query::{BoundQuery, QueryDefaults, QueryError, SqlParam};
pub use repo_config::RepositoryConfig;
pub use repositories::{PoolStats, SqliteRepository};
pub use repository::{CrimeRepository, ErrorContext, RepositoryError, RepositoryResult};
pub use services::{ServiceError, ServiceResult};
