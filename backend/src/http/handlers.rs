//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for parsing, validation and storage.

use std::collections::HashMap;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};

use super::dto::{
    Code, CreateIncidentRequest, DeleteIncidentRequest, HealthResponse, Incident, Neighborhood,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            "error".to_string()
        }
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Reference tables
// =============================================================================

/// GET /codes?code=600,700
pub async fn list_codes(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> HandlerResult<Vec<Code>> {
    let Query(params) = query?;
    let codes = db_services::list_codes(state.repository.as_ref(), &params).await?;
    Ok(Json(codes))
}

/// GET /neighborhoods?id=1,2
pub async fn list_neighborhoods(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> HandlerResult<Vec<Neighborhood>> {
    let Query(params) = query?;
    let neighborhoods = db_services::list_neighborhoods(state.repository.as_ref(), &params).await?;
    Ok(Json(neighborhoods))
}

// =============================================================================
// Incidents
// =============================================================================

/// GET /incidents
///
/// Accepts `start_date`, `end_date`, `code`, `grid`, `neighborhood` and `limit`.
pub async fn list_incidents(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> HandlerResult<Vec<Incident>> {
    let Query(params) = query?;
    let incidents = db_services::list_incidents(
        state.repository.as_ref(),
        &params,
        &state.query_defaults,
    )
    .await?;
    Ok(Json(incidents))
}

/// PUT /new-incident
pub async fn create_incident(
    State(state): State<AppState>,
    payload: Result<Json<CreateIncidentRequest>, JsonRejection>,
) -> Result<String, AppError> {
    let Json(request) = payload?;
    let case_number = db_services::create_incident(state.repository.as_ref(), &request).await?;
    Ok(format!("Incident {} created", case_number))
}

/// DELETE /remove-incident
pub async fn delete_incident(
    State(state): State<AppState>,
    payload: Result<Json<DeleteIncidentRequest>, JsonRejection>,
) -> Result<String, AppError> {
    let Json(request) = payload?;
    let case_number = db_services::delete_incident(state.repository.as_ref(), &request).await?;
    Ok(format!("Incident {} removed", case_number))
}
