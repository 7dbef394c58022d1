//! Data Transfer Objects for the HTTP API.
//!
//! Resource and request types live in [`crate::api`]; this module only adds
//! the response shapes that are specific to the HTTP surface.

use serde::{Deserialize, Serialize};

pub use crate::api::{Code, CreateIncidentRequest, DeleteIncidentRequest, Incident, Neighborhood};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Crate version
    pub version: String,
    /// Database connection status
    pub database: String,
}
