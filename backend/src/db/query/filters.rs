//! Typed filters parsed from raw query-string maps.
//!
//! Only whitelisted keys are read; anything else in the map is ignored.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use super::{QueryDefaults, QueryError, MAX_LIST_LEN};
use crate::api::DATE_TIME_FORMAT;

pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const CODE: &str = "code";
pub const GRID: &str = "grid";
pub const NEIGHBORHOOD: &str = "neighborhood";
pub const LIMIT: &str = "limit";
pub const ID: &str = "id";

/// Filter for `GET /codes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeFilter {
    pub codes: Option<Vec<i32>>,
}

impl CodeFilter {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, QueryError> {
        Ok(Self {
            codes: optional_id_list(params, CODE)?,
        })
    }
}

/// Filter for `GET /neighborhoods`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborhoodFilter {
    pub ids: Option<Vec<i32>>,
}

impl NeighborhoodFilter {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, QueryError> {
        Ok(Self {
            ids: optional_id_list(params, ID)?,
        })
    }
}

/// Filter for `GET /incidents`.
///
/// Fields are listed in the order their predicates are emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentFilter {
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub codes: Option<Vec<i32>>,
    pub grids: Option<Vec<i32>>,
    pub neighborhoods: Option<Vec<i32>>,
    pub limit: u32,
}

impl Default for IncidentFilter {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            codes: None,
            grids: None,
            neighborhoods: None,
            limit: QueryDefaults::default().default_limit,
        }
    }
}

impl IncidentFilter {
    /// Parse every recognized incident filter out of `params`.
    ///
    /// A date-only `start_date` covers the whole day from midnight, a
    /// date-only `end_date` runs through `23:59:59`. `limit` falls back to
    /// `defaults.default_limit` when absent or not a non-negative integer.
    pub fn from_params(
        params: &HashMap<String, String>,
        defaults: &QueryDefaults,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            start_date: optional_bound(params, START_DATE, DayEdge::Start)?,
            end_date: optional_bound(params, END_DATE, DayEdge::End)?,
            codes: optional_id_list(params, CODE)?,
            grids: optional_id_list(params, GRID)?,
            neighborhoods: optional_id_list(params, NEIGHBORHOOD)?,
            limit: parse_limit(params.get(LIMIT).map(String::as_str), defaults.default_limit),
        })
    }

    /// Number of recognized filters present.
    pub fn present_filter_count(&self) -> usize {
        [
            self.start_date.is_some(),
            self.end_date.is_some(),
            self.codes.is_some(),
            self.grids.is_some(),
            self.neighborhoods.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    /// Number of values the filters bind, not counting the limit.
    pub fn bound_value_count(&self) -> usize {
        let scalars = usize::from(self.start_date.is_some()) + usize::from(self.end_date.is_some());
        let lists = [&self.codes, &self.grids, &self.neighborhoods]
            .iter()
            .filter_map(|list| list.as_ref().map(Vec::len))
            .sum::<usize>();
        scalars + lists
    }
}

#[derive(Debug, Clone, Copy)]
enum DayEdge {
    Start,
    End,
}

fn optional_id_list(
    params: &HashMap<String, String>,
    param: &str,
) -> Result<Option<Vec<i32>>, QueryError> {
    params
        .get(param)
        .map(|value| parse_id_list(param, value))
        .transpose()
}

fn optional_bound(
    params: &HashMap<String, String>,
    param: &str,
    edge: DayEdge,
) -> Result<Option<NaiveDateTime>, QueryError> {
    params
        .get(param)
        .map(|value| parse_bound(param, value, edge))
        .transpose()
}

/// Parse a comma-separated list of integers.
///
/// Whitespace around elements is tolerated; an empty element is not.
pub fn parse_id_list(param: &str, value: &str) -> Result<Vec<i32>, QueryError> {
    let ids = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| QueryError::InvalidList {
                    param: param.to_string(),
                    value: part.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.len() > MAX_LIST_LEN {
        return Err(QueryError::ListTooLong {
            param: param.to_string(),
            len: ids.len(),
            max: MAX_LIST_LEN,
        });
    }

    Ok(ids)
}

fn parse_bound(param: &str, value: &str, edge: DayEdge) -> Result<NaiveDateTime, QueryError> {
    let value = value.trim();
    let invalid = || QueryError::InvalidDate {
        param: param.to_string(),
        value: value.to_string(),
    };

    if let Ok(date_time) = NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT) {
        return Ok(date_time);
    }
    if let Ok(date_time) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(date_time);
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())?;
    match edge {
        DayEdge::Start => date.and_hms_opt(0, 0, 0).ok_or_else(invalid),
        DayEdge::End => date.and_hms_opt(23, 59, 59).ok_or_else(invalid),
    }
}

fn parse_limit(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}
