//! St. Paul crime HTTP server binary.
//!
//! Opens the SQLite database, builds the router and serves requests.
//!
//! # Usage
//!
//! ```bash
//! DATABASE_PATH=db/stpaul_crime.sqlite3 cargo run --bin crime-server
//!
//! # Or with a TOML file
//! CRIME_CONFIG=crime.toml cargo run --bin crime-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8000)
//! - `CRIME_CONFIG`: Path of a TOML configuration file (optional). Without it,
//!   `crime.toml`, `backend/crime.toml` and `../crime.toml` are tried in order
//! - `DATABASE_PATH` / `CRIME_DB_PATH`: Database file, when no TOML file is found
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use stpaul_crime::db::{QueryDefaults, RepositoryConfig, SqliteConfig, SqliteRepository};
use stpaul_crime::http::{create_router, AppState};

fn load_config() -> anyhow::Result<(SqliteConfig, QueryDefaults)> {
    match env::var("CRIME_CONFIG") {
        Ok(path) => {
            let config = RepositoryConfig::from_file(&path)
                .with_context(|| format!("loading {}", path))?;
            info!(path = %path, "Loaded configuration file");
            Ok((config.to_sqlite_config(), config.query_defaults()))
        }
        Err(_) => {
            if let Some(config) = RepositoryConfig::from_default_location()? {
                info!("Loaded crime.toml from the working directory");
                return Ok((config.to_sqlite_config(), config.query_defaults()));
            }
            let sqlite = SqliteConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
            Ok((sqlite, QueryDefaults::default()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting crime HTTP server");

    let (sqlite_config, query_defaults) = load_config()?;

    // Pool construction opens connections synchronously.
    let repository = tokio::task::spawn_blocking(move || SqliteRepository::new(sqlite_config))
        .await
        .context("repository initialization task failed")??;
    info!("Repository initialized successfully");

    let state = AppState::new(Arc::new(repository)).with_query_defaults(query_defaults);
    let app = create_router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8000);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
