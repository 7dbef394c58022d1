//! Query construction and parameter binding.
//!
//! Raw HTTP query parameters are parsed into typed filters ([`filters`]) and
//! then rendered into SQL text plus a positional parameter list
//! ([`builder`]). String composition only ever decides the *shape* of the
//! statement (which clauses appear, how many placeholders an `IN` list has).
//! Every user-supplied value travels as a [`SqlParam`].
//!
//! ```text
//! HashMap<String, String> ──► IncidentFilter ──► BoundQuery { sql, params }
//!        (raw query)           (validated)         (ready for the driver)
//! ```

pub mod builder;
pub mod filters;

pub use builder::{
    count_incidents, delete_incident, incident_exists, insert_incident, select_codes,
    select_incidents, select_neighborhoods, Column, Predicates,
};
pub use filters::{CodeFilter, IncidentFilter, NeighborhoodFilter};

use std::fmt;

/// Row cap applied when `limit` is absent or not a number.
pub const DEFAULT_LIMIT: u32 = 1000;

/// Longest accepted comma-separated id list.
///
/// Keeps every generated statement well under SQLite's host parameter limit.
pub const MAX_LIST_LEN: usize = 500;

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Integer(i32),
    BigInt(i64),
    Text(String),
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Integer(v) => write!(f, "{}", v),
            SqlParam::BigInt(v) => write!(f, "{}", v),
            SqlParam::Text(v) => write!(f, "{:?}", v),
        }
    }
}

/// SQL text paired with its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    sql: String,
    params: Vec<SqlParam>,
}

impl BoundQuery {
    pub fn new(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Number of `?` placeholders in the SQL text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

impl fmt::Display for BoundQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        write!(f, "{} -- [{}]", self.sql, params.join(", "))
    }
}

/// Query defaults shared by every list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDefaults {
    pub default_limit: u32,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
        }
    }
}

/// Rejection of a filter value before any SQL is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("invalid value '{value}' in '{param}': expected comma-separated integers")]
    InvalidList { param: String, value: String },

    #[error("'{param}' lists {len} values, at most {max} are allowed")]
    ListTooLong {
        param: String,
        len: usize,
        max: usize,
    },

    #[error("invalid date '{value}' in '{param}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS")]
    InvalidDate { param: String, value: String },
}
