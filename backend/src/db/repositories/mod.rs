//! Repository implementations module.
//!
//! - `sqlite`: SQLite implementation with Diesel and an r2d2 pool
#[cfg(feature = "sqlite-repo")]
pub mod sqlite;

#[cfg(feature = "sqlite-repo")]
pub use sqlite::{PoolStats, SqliteRepository};
