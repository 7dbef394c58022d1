//! SQLite repository implementation using Diesel.
//!
//! This module owns the single storage resource of the process: an r2d2 pool
//! of `SqliteConnection`s (one connection by default). SQL text and
//! parameters come from [`crate::db::query`]; this layer only binds and runs
//! them.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - `busy_timeout` applied to every pooled connection
//! - Optional baseline schema creation (`schema.sql`)
//! - Query statistics for monitoring
//!
//! ## Configuration
//!
//! See [`SqliteConfig`] for the environment variables and defaults.

use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sql_query;
use diesel::sql_types::{BigInt, Integer, Text};
use diesel::sqlite::{Sqlite, SqliteConnection};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, info};

use crate::api::{Code, Incident, Neighborhood, NewIncident};
use crate::db::config::SqliteConfig;
use crate::db::query::{self, BoundQuery, CodeFilter, IncidentFilter, NeighborhoodFilter, SqlParam};
use crate::db::repository::{CrimeRepository, ErrorContext, RepositoryError, RepositoryResult};

mod models;

use models::*;

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

const SCHEMA: &str = include_str!("schema.sql");

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Statements handed to the driver
    pub total_queries: u64,
    /// Statements that ended in a storage failure
    pub failed_queries: u64,
}

#[derive(Debug, Clone, Copy)]
struct ConnectionPragmas {
    busy_timeout_ms: u64,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", self.busy_timeout_ms))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Diesel-backed repository for the SQLite crime database.
#[derive(Clone, Debug)]
pub struct SqliteRepository {
    pool: SqlitePool,
    config: SqliteConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
}

impl SqliteRepository {
    /// Open the database and build the connection pool.
    ///
    /// The file must already exist unless `config.create_schema` is set, in
    /// which case missing tables are created from the bundled schema.
    ///
    /// # Returns
    /// * `Ok(SqliteRepository)` on success
    /// * `Err(RepositoryError)` if the file is missing or the pool cannot connect
    pub fn new(config: SqliteConfig) -> RepositoryResult<Self> {
        if !config.create_schema && !config.is_in_memory() && !config.database_path.exists() {
            return Err(RepositoryError::configuration(
                format!(
                    "database file {} does not exist",
                    config.database_path.display()
                ),
                ErrorContext::new("open_database"),
            ));
        }

        // Every in-memory connection is its own database.
        let max_size = if config.is_in_memory() {
            1
        } else {
            config.max_pool_size.max(1)
        };

        let manager = ConnectionManager::<SqliteConnection>::new(
            config.database_path.to_string_lossy().into_owned(),
        );

        let pool = Pool::builder()
            .max_size(max_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_customizer(Box::new(ConnectionPragmas {
                busy_timeout_ms: config.busy_timeout_ms,
            }))
            .build(manager)
            .map_err(|e| RepositoryError::from(e).with_operation("create_pool"))?;

        if config.create_schema {
            let mut conn = pool
                .get()
                .map_err(|e| RepositoryError::from(e).with_operation("create_schema"))?;
            Self::create_schema(&mut conn)?;
        }

        info!(
            path = %config.database_path.display(),
            pool_size = max_size,
            "SQLite repository ready"
        );

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
        })
    }

    fn create_schema(conn: &mut SqliteConnection) -> RepositoryResult<()> {
        conn.batch_execute(SCHEMA).map_err(|e| {
            RepositoryError::internal(
                format!("Schema creation failed: {}", e),
                ErrorContext::new("create_schema"),
            )
        })
    }

    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Run `query` and map every row into `T`.
    pub async fn query<T>(&self, query: BoundQuery) -> RepositoryResult<Vec<T>>
    where
        T: QueryableByName<Sqlite> + Send + 'static,
    {
        self.fetch("query", query).await
    }

    /// Run a write statement and return the affected-row count.
    ///
    /// Zero affected rows is a successful result.
    pub async fn execute(&self, query: BoundQuery) -> RepositoryResult<usize> {
        self.run("execute", query).await
    }

    async fn fetch<T>(&self, operation: &'static str, query: BoundQuery) -> RepositoryResult<Vec<T>>
    where
        T: QueryableByName<Sqlite> + Send + 'static,
    {
        self.with_conn(operation, move |conn| load_rows(conn, &query))
            .await
    }

    async fn run(&self, operation: &'static str, query: BoundQuery) -> RepositoryResult<usize> {
        self.with_conn(operation, move |conn| execute_statement(conn, &query))
            .await
    }

    /// Execute a database operation on a pooled connection.
    ///
    /// The closure runs on the blocking thread pool and is never retried.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                failed_queries.fetch_add(1, Ordering::Relaxed);
                RepositoryError::from(e).with_operation(operation)
            })?;

            total_queries.fetch_add(1, Ordering::Relaxed);
            let started = Instant::now();
            let result = f(&mut conn);
            debug!(
                operation,
                elapsed_ms = started.elapsed().as_millis() as u64,
                ok = result.is_ok(),
                "storage call finished"
            );

            result.map_err(|e| {
                if e.is_storage_failure() {
                    failed_queries.fetch_add(1, Ordering::Relaxed);
                }
                e.with_operation(operation)
            })
        })
        .await
        .map_err(|e| {
            RepositoryError::internal(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics.
    pub fn pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.pool.max_size(),
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
        }
    }
}

fn bind(query: &BoundQuery) -> BoxedSqlQuery<'static, Sqlite, SqlQuery> {
    let mut statement: BoxedSqlQuery<'static, Sqlite, SqlQuery> =
        sql_query(query.sql()).into_boxed();
    for param in query.params() {
        statement = match param {
            SqlParam::Integer(v) => statement.bind::<Integer, _>(*v),
            SqlParam::BigInt(v) => statement.bind::<BigInt, _>(*v),
            SqlParam::Text(v) => statement.bind::<Text, _>(v.clone()),
        };
    }
    statement
}

fn load_rows<T>(conn: &mut SqliteConnection, query: &BoundQuery) -> RepositoryResult<Vec<T>>
where
    T: QueryableByName<Sqlite> + 'static,
{
    debug!(%query, "load");
    bind(query).load::<T>(conn).map_err(RepositoryError::from)
}

fn execute_statement(conn: &mut SqliteConnection, query: &BoundQuery) -> RepositoryResult<usize> {
    debug!(%query, "execute");
    bind(query).execute(conn).map_err(RepositoryError::from)
}

fn first_count(rows: &[CountRow]) -> i64 {
    rows.first().map(|row| row.count).unwrap_or(0)
}

#[async_trait]
impl CrimeRepository for SqliteRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let rows: Vec<CountRow> = self
            .fetch("health_check", BoundQuery::new("SELECT 1 AS count", Vec::new()))
            .await?;
        Ok(first_count(&rows) == 1)
    }

    async fn list_codes(&self, filter: &CodeFilter) -> RepositoryResult<Vec<Code>> {
        let rows: Vec<CodeRow> = self.fetch("list_codes", query::select_codes(filter)).await?;
        Ok(rows.into_iter().map(Code::from).collect())
    }

    async fn list_neighborhoods(
        &self,
        filter: &NeighborhoodFilter,
    ) -> RepositoryResult<Vec<Neighborhood>> {
        let rows: Vec<NeighborhoodRow> = self
            .fetch("list_neighborhoods", query::select_neighborhoods(filter))
            .await?;
        Ok(rows.into_iter().map(Neighborhood::from).collect())
    }

    async fn list_incidents(&self, filter: &IncidentFilter) -> RepositoryResult<Vec<Incident>> {
        let rows: Vec<IncidentRow> = self
            .fetch("list_incidents", query::select_incidents(filter))
            .await?;
        rows.into_iter().map(Incident::try_from).collect()
    }

    async fn count_incidents(&self) -> RepositoryResult<i64> {
        let rows: Vec<CountRow> = self
            .fetch("count_incidents", query::count_incidents())
            .await?;
        Ok(first_count(&rows))
    }

    async fn incident_exists(&self, case_number: &str) -> RepositoryResult<bool> {
        let rows: Vec<CountRow> = self
            .fetch("incident_exists", query::incident_exists(case_number))
            .await?;
        Ok(first_count(&rows) > 0)
    }

    async fn create_incident(&self, incident: &NewIncident) -> RepositoryResult<()> {
        let incident = incident.clone();
        self.with_conn("create_incident", move |conn| {
            conn.immediate_transaction::<_, RepositoryError, _>(|tx| {
                let existing: Vec<CountRow> =
                    load_rows(tx, &query::incident_exists(&incident.case_number))?;
                if first_count(&existing) > 0 {
                    return Err(RepositoryError::conflict(
                        format!("Case number {} already exists", incident.case_number),
                        ErrorContext::new("create_incident")
                            .with_entity("incident")
                            .with_entity_id(&incident.case_number),
                    ));
                }
                execute_statement(tx, &query::insert_incident(&incident))?;
                debug!(case_number = %incident.case_number, "incident inserted");
                Ok(())
            })
        })
        .await
    }

    async fn delete_incident(&self, case_number: &str) -> RepositoryResult<()> {
        let affected = self
            .run("delete_incident", query::delete_incident(case_number))
            .await?;
        if affected == 0 {
            return Err(RepositoryError::not_found(
                format!("Case number {} does not exist", case_number),
                ErrorContext::new("delete_incident")
                    .with_entity("incident")
                    .with_entity_id(case_number),
            ));
        }
        debug!(case_number, affected, "incident deleted");
        Ok(())
    }
}
