//! Repository trait definition for database operations.
//!
//! [`CrimeRepository`] is the seam between the service layer and storage.
//! Implementations receive already-validated filters and incidents, so no
//! raw request data reaches this layer.
//!
//! - [`error`]: Error types for repository operations

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::api::{Code, Incident, Neighborhood, NewIncident};
use crate::db::query::{CodeFilter, IncidentFilter, NeighborhoodFilter};

/// Repository trait for the crime dataset.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request tasks.
#[async_trait]
pub trait CrimeRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the database connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Reference Tables ====================

    /// List codes, optionally restricted to the given code numbers.
    async fn list_codes(&self, filter: &CodeFilter) -> RepositoryResult<Vec<Code>>;

    /// List neighborhoods, optionally restricted to the given numbers.
    async fn list_neighborhoods(
        &self,
        filter: &NeighborhoodFilter,
    ) -> RepositoryResult<Vec<Neighborhood>>;

    // ==================== Incidents ====================

    /// List incidents matching `filter`, newest first, at most `filter.limit` rows.
    async fn list_incidents(&self, filter: &IncidentFilter) -> RepositoryResult<Vec<Incident>>;

    /// Total number of stored incidents.
    async fn count_incidents(&self) -> RepositoryResult<i64>;

    /// Whether an incident with `case_number` exists.
    async fn incident_exists(&self, case_number: &str) -> RepositoryResult<bool>;

    /// Insert a new incident.
    ///
    /// # Returns
    /// * `Err(RepositoryError::Conflict)` - If `case_number` is already stored;
    ///   the existing row is left untouched
    async fn create_incident(&self, incident: &NewIncident) -> RepositoryResult<()>;

    /// Delete the incident with `case_number`.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no row was deleted
    async fn delete_incident(&self, case_number: &str) -> RepositoryResult<()>;
}
