//! Public API surface for the crime query service.
//!
//! This file consolidates the resource types returned by the HTTP API and the
//! request bodies it accepts. All types derive Serialize/Deserialize for JSON
//! serialization.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Storage format of `Incidents.date_time`.
///
/// ISO-8601 without offset, so lexical order matches chronological order.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Crime-type catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    pub code: i32,
    pub incident: String,
}

/// Neighborhood reference entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub neighborhood_number: i32,
    pub neighborhood_name: String,
}

/// Incident as projected by the list endpoint.
///
/// The stored `date_time` is split back into its `date` and `time` parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub case_number: String,
    pub date: String,
    pub time: String,
    pub code: i32,
    pub incident: String,
    pub police_grid: i32,
    pub neighborhood_number: i32,
    pub block: String,
}

/// A validated incident ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncident {
    pub case_number: String,
    pub date_time: NaiveDateTime,
    pub code: i32,
    pub incident: String,
    pub police_grid: i32,
    pub neighborhood_number: i32,
    pub block: String,
}

impl NewIncident {
    /// `date_time` rendered in the stored text format.
    pub fn date_time_text(&self) -> String {
        self.date_time.format(DATE_TIME_FORMAT).to_string()
    }
}

/// Request body for `PUT /new-incident`.
///
/// Every field is optional at the serde level so that a missing field is
/// reported by name instead of as a generic deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateIncidentRequest {
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub incident: Option<String>,
    #[serde(default)]
    pub police_grid: Option<i64>,
    #[serde(default)]
    pub neighborhood_number: Option<i64>,
    #[serde(default)]
    pub block: Option<String>,
}

/// Request body for `DELETE /remove-incident`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteIncidentRequest {
    #[serde(default)]
    pub case_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_date_time_text_uses_storage_format() {
        let incident = NewIncident {
            case_number: "22000001".to_string(),
            date_time: NaiveDate::from_ymd_opt(2022, 5, 31)
                .unwrap()
                .and_hms_opt(23, 57, 37)
                .unwrap(),
            code: 600,
            incident: "Theft".to_string(),
            police_grid: 87,
            neighborhood_number: 7,
            block: "THOMAS AV  & VICTORIA".to_string(),
        };
        assert_eq!(incident.date_time_text(), "2022-05-31T23:57:37");
    }

    #[test]
    fn test_create_request_missing_fields_deserialize_as_none() {
        let request: CreateIncidentRequest =
            serde_json::from_str(r#"{"case_number": "1", "code": 600}"#).unwrap();
        assert_eq!(request.case_number.as_deref(), Some("1"));
        assert_eq!(request.code, Some(600));
        assert!(request.date.is_none());
        assert!(request.block.is_none());
    }

    #[test]
    fn test_incident_serializes_split_date_and_time() {
        let incident = Incident {
            case_number: "1".to_string(),
            date: "2022-05-31".to_string(),
            time: "23:57:37".to_string(),
            code: 600,
            incident: "Theft".to_string(),
            police_grid: 87,
            neighborhood_number: 7,
            block: "98X UNIVERSITY AV W".to_string(),
        };
        let value = serde_json::to_value(&incident).unwrap();
        assert_eq!(value["date"], "2022-05-31");
        assert_eq!(value["time"], "23:57:37");
        assert_eq!(value["police_grid"], 87);
    }
}
