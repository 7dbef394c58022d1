//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::query::QueryDefaults;
use crate::db::repository::CrimeRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn CrimeRepository>,
    /// Defaults applied to list queries
    pub query_defaults: QueryDefaults,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn CrimeRepository>) -> Self {
        Self {
            repository,
            query_defaults: QueryDefaults::default(),
        }
    }

    pub fn with_query_defaults(mut self, query_defaults: QueryDefaults) -> Self {
        self.query_defaults = query_defaults;
        self
    }
}
