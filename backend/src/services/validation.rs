//! Write-body validation.
//!
//! Request bodies arrive with every field optional so that absence can be
//! reported by field name. Validation turns them into [`NewIncident`] or a
//! bare case number, and runs before any storage call.

use chrono::{NaiveDate, NaiveTime};

use crate::api::{CreateIncidentRequest, DeleteIncidentRequest, NewIncident};

/// Rejection of a create/delete body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ValidationError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField(field) => field,
            ValidationError::InvalidField { field, .. } => field,
        }
    }
}

/// Validate a create body into an insertable incident.
///
/// Fields are checked in body order, so the first problem reported is the
/// first offending field.
pub fn validate_new_incident(request: &CreateIncidentRequest) -> Result<NewIncident, ValidationError> {
    let case_number = required_text("case_number", request.case_number.as_deref())?;
    let date = parse_date(required_text("date", request.date.as_deref())?.as_str())?;
    let time = parse_time(required_text("time", request.time.as_deref())?.as_str())?;
    let code = required_int("code", request.code)?;
    let incident = required_text("incident", request.incident.as_deref())?;
    let police_grid = required_int("police_grid", request.police_grid)?;
    let neighborhood_number = required_int("neighborhood_number", request.neighborhood_number)?;
    let block = required_text("block", request.block.as_deref())?;

    Ok(NewIncident {
        case_number,
        date_time: date.and_time(time),
        code,
        incident,
        police_grid,
        neighborhood_number,
        block,
    })
}

/// Validate a delete body into the case number to remove.
pub fn validate_case_number(request: &DeleteIncidentRequest) -> Result<String, ValidationError> {
    required_text("case_number", request.case_number.as_deref())
}

fn required_text(field: &'static str, value: Option<&str>) -> Result<String, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField(field))?.trim();
    if value.is_empty() {
        return Err(ValidationError::invalid(field, "must not be blank"));
    }
    Ok(value.to_string())
}

fn required_int(field: &'static str, value: Option<i64>) -> Result<i32, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField(field))?;
    i32::try_from(value).map_err(|_| ValidationError::invalid(field, format!("{} is out of range", value)))
}

fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid("date", format!("'{}' is not YYYY-MM-DD", value)))
}

fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| ValidationError::invalid("time", format!("'{}' is not HH:MM:SS", value)))
}
