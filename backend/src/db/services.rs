//! Service layer for the crime dataset.
//!
//! Handlers call these functions with raw request data. Each one parses or
//! validates its input first and only then talks to the repository, so a
//! rejected request never reaches storage.

use std::collections::HashMap;

use tracing::{debug, info};

use super::query::{CodeFilter, IncidentFilter, NeighborhoodFilter, QueryDefaults, QueryError};
use super::repository::{CrimeRepository, RepositoryError};
use crate::api::{Code, CreateIncidentRequest, DeleteIncidentRequest, Incident, Neighborhood};
use crate::services::validation::{self, ValidationError};

/// Failure of a service call.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Check if the database connection is healthy.
pub async fn health_check<R: CrimeRepository + ?Sized>(repo: &R) -> Result<bool, RepositoryError> {
    repo.health_check().await
}

/// `GET /codes`
pub async fn list_codes<R: CrimeRepository + ?Sized>(
    repo: &R,
    params: &HashMap<String, String>,
) -> ServiceResult<Vec<Code>> {
    let filter = CodeFilter::from_params(params)
        .inspect_err(|e| debug!(error = %e, "rejected code filter"))?;
    Ok(repo.list_codes(&filter).await?)
}

/// `GET /neighborhoods`
pub async fn list_neighborhoods<R: CrimeRepository + ?Sized>(
    repo: &R,
    params: &HashMap<String, String>,
) -> ServiceResult<Vec<Neighborhood>> {
    let filter = NeighborhoodFilter::from_params(params)
        .inspect_err(|e| debug!(error = %e, "rejected neighborhood filter"))?;
    Ok(repo.list_neighborhoods(&filter).await?)
}

/// `GET /incidents`
///
/// Unrecognized keys are ignored. A missing or unusable `limit` falls back to
/// `defaults.default_limit`.
pub async fn list_incidents<R: CrimeRepository + ?Sized>(
    repo: &R,
    params: &HashMap<String, String>,
    defaults: &QueryDefaults,
) -> ServiceResult<Vec<Incident>> {
    let filter = IncidentFilter::from_params(params, defaults)
        .inspect_err(|e| debug!(error = %e, "rejected incident filter"))?;
    debug!(
        filters = filter.present_filter_count(),
        limit = filter.limit,
        "listing incidents"
    );
    Ok(repo.list_incidents(&filter).await?)
}

/// `PUT /new-incident`
///
/// Returns the stored case number.
pub async fn create_incident<R: CrimeRepository + ?Sized>(
    repo: &R,
    request: &CreateIncidentRequest,
) -> ServiceResult<String> {
    let incident = validation::validate_new_incident(request)
        .inspect_err(|e| debug!(error = %e, "rejected incident body"))?;
    repo.create_incident(&incident).await?;
    info!(case_number = %incident.case_number, "incident stored");
    Ok(incident.case_number)
}

/// `DELETE /remove-incident`
///
/// Returns the removed case number.
pub async fn delete_incident<R: CrimeRepository + ?Sized>(
    repo: &R,
    request: &DeleteIncidentRequest,
) -> ServiceResult<String> {
    let case_number = validation::validate_case_number(request)?;
    repo.delete_incident(&case_number).await?;
    info!(case_number = %case_number, "incident removed");
    Ok(case_number)
}
