use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Nullable, Text};

use crate::api::{Code, Incident, Neighborhood};
use crate::db::repository::{ErrorContext, RepositoryError};

#[derive(Debug, Clone, QueryableByName)]
pub struct CodeRow {
    #[diesel(sql_type = Integer)]
    pub code: i32,
    #[diesel(sql_type = Text)]
    pub incident: String,
}

impl From<CodeRow> for Code {
    fn from(row: CodeRow) -> Self {
        Code {
            code: row.code,
            incident: row.incident,
        }
    }
}

#[derive(Debug, Clone, QueryableByName)]
pub struct NeighborhoodRow {
    #[diesel(sql_type = Integer)]
    pub neighborhood_number: i32,
    #[diesel(sql_type = Text)]
    pub neighborhood_name: String,
}

impl From<NeighborhoodRow> for Neighborhood {
    fn from(row: NeighborhoodRow) -> Self {
        Neighborhood {
            neighborhood_number: row.neighborhood_number,
            neighborhood_name: row.neighborhood_name,
        }
    }
}

/// Incident projection row.
///
/// `date()`/`time()` yield NULL for a stored value SQLite cannot parse.
#[derive(Debug, Clone, QueryableByName)]
pub struct IncidentRow {
    #[diesel(sql_type = Text)]
    pub case_number: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub date: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub time: Option<String>,
    #[diesel(sql_type = Integer)]
    pub code: i32,
    #[diesel(sql_type = Text)]
    pub incident: String,
    #[diesel(sql_type = Integer)]
    pub police_grid: i32,
    #[diesel(sql_type = Integer)]
    pub neighborhood_number: i32,
    #[diesel(sql_type = Text)]
    pub block: String,
}

/// Fails when SQLite could not split the stored `date_time` into a date and a
/// time, which only happens for rows written outside this service.
impl TryFrom<IncidentRow> for Incident {
    type Error = RepositoryError;

    fn try_from(row: IncidentRow) -> Result<Self, Self::Error> {
        let (Some(date), Some(time)) = (row.date, row.time) else {
            return Err(RepositoryError::internal(
                format!(
                    "stored date_time of case {} is not a valid timestamp",
                    row.case_number
                ),
                ErrorContext::new("list_incidents")
                    .with_entity("incident")
                    .with_entity_id(&row.case_number),
            ));
        };

        Ok(Incident {
            case_number: row.case_number,
            date,
            time,
            code: row.code,
            incident: row.incident,
            police_grid: row.police_grid,
            neighborhood_number: row.neighborhood_number,
            block: row.block,
        })
    }
}

#[derive(Debug, Clone, Copy, QueryableByName)]
pub struct CountRow {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}
