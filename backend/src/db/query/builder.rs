//! SQL composition for every statement the service issues.
//!
//! Identifiers come from the closed [`Column`] set, never from the request.
//! Values are appended to the parameter list in the same order their `?`
//! placeholders appear in the text.

use super::filters::{CodeFilter, IncidentFilter, NeighborhoodFilter};
use super::{BoundQuery, SqlParam};
use crate::api::{NewIncident, DATE_TIME_FORMAT};

const INCIDENT_PROJECTION: &str = "case_number, date(date_time) AS date, time(date_time) AS time, \
     code, incident, police_grid, neighborhood_number, block";

/// Columns a predicate may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    CaseNumber,
    DateTime,
    Code,
    PoliceGrid,
    NeighborhoodNumber,
}

impl Column {
    pub fn as_str(self) -> &'static str {
        match self {
            Column::CaseNumber => "case_number",
            Column::DateTime => "date_time",
            Column::Code => "code",
            Column::PoliceGrid => "police_grid",
            Column::NeighborhoodNumber => "neighborhood_number",
        }
    }
}

/// Accumulated `AND`-joined predicates and their parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicates {
    clauses: Vec<String>,
    params: Vec<SqlParam>,
}

impl Predicates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Predicates for an incident filter, in the fixed order
    /// `start_date`, `end_date`, `code`, `grid`, `neighborhood`.
    pub fn for_incidents(filter: &IncidentFilter) -> Self {
        let mut predicates = Self::new();
        if let Some(start) = filter.start_date {
            predicates.at_least(
                Column::DateTime,
                SqlParam::Text(start.format(DATE_TIME_FORMAT).to_string()),
            );
        }
        if let Some(end) = filter.end_date {
            predicates.at_most(
                Column::DateTime,
                SqlParam::Text(end.format(DATE_TIME_FORMAT).to_string()),
            );
        }
        if let Some(codes) = &filter.codes {
            predicates.any_of(Column::Code, codes);
        }
        if let Some(grids) = &filter.grids {
            predicates.any_of(Column::PoliceGrid, grids);
        }
        if let Some(neighborhoods) = &filter.neighborhoods {
            predicates.any_of(Column::NeighborhoodNumber, neighborhoods);
        }
        predicates
    }

    pub fn at_least(&mut self, column: Column, value: SqlParam) {
        self.clauses.push(format!("{} >= ?", column.as_str()));
        self.params.push(value);
    }

    pub fn at_most(&mut self, column: Column, value: SqlParam) {
        self.clauses.push(format!("{} <= ?", column.as_str()));
        self.params.push(value);
    }

    pub fn equals(&mut self, column: Column, value: SqlParam) {
        self.clauses.push(format!("{} = ?", column.as_str()));
        self.params.push(value);
    }

    /// `column IN (?, ?, …)` with one placeholder per value.
    ///
    /// An empty slice matches nothing.
    pub fn any_of(&mut self, column: Column, values: &[i32]) {
        if values.is_empty() {
            self.clauses.push("0 = 1".to_string());
            return;
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        self.clauses
            .push(format!("{} IN ({})", column.as_str(), placeholders));
        self.params
            .extend(values.iter().copied().map(SqlParam::Integer));
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// The predicate text; `1=1` when nothing was added.
    pub fn render(&self) -> String {
        if self.clauses.is_empty() {
            "1=1".to_string()
        } else {
            self.clauses.join(" AND ")
        }
    }

    pub fn into_parts(self) -> (String, Vec<SqlParam>) {
        let clause = self.render();
        (clause, self.params)
    }
}

pub fn select_codes(filter: &CodeFilter) -> BoundQuery {
    let mut predicates = Predicates::new();
    if let Some(codes) = &filter.codes {
        predicates.any_of(Column::Code, codes);
    }
    let (clause, params) = predicates.into_parts();
    BoundQuery::new(
        format!(
            "SELECT code, incident FROM Codes WHERE {} ORDER BY code",
            clause
        ),
        params,
    )
}

pub fn select_neighborhoods(filter: &NeighborhoodFilter) -> BoundQuery {
    let mut predicates = Predicates::new();
    if let Some(ids) = &filter.ids {
        predicates.any_of(Column::NeighborhoodNumber, ids);
    }
    let (clause, params) = predicates.into_parts();
    BoundQuery::new(
        format!(
            "SELECT neighborhood_number, neighborhood_name FROM Neighborhoods WHERE {} \
             ORDER BY neighborhood_number",
            clause
        ),
        params,
    )
}

/// Newest-first incident projection, capped by the bound `limit`.
pub fn select_incidents(filter: &IncidentFilter) -> BoundQuery {
    let (clause, mut params) = Predicates::for_incidents(filter).into_parts();
    params.push(SqlParam::BigInt(i64::from(filter.limit)));
    BoundQuery::new(
        format!(
            "SELECT {} FROM Incidents WHERE {} ORDER BY date_time DESC, case_number DESC LIMIT ?",
            INCIDENT_PROJECTION, clause
        ),
        params,
    )
}

/// Rows sharing `case_number`, as a single `count` column.
pub fn incident_exists(case_number: &str) -> BoundQuery {
    let mut predicates = Predicates::new();
    predicates.equals(Column::CaseNumber, SqlParam::Text(case_number.to_string()));
    let (clause, params) = predicates.into_parts();
    BoundQuery::new(
        format!("SELECT COUNT(*) AS count FROM Incidents WHERE {}", clause),
        params,
    )
}

pub fn count_incidents() -> BoundQuery {
    BoundQuery::new("SELECT COUNT(*) AS count FROM Incidents", Vec::new())
}

pub fn insert_incident(incident: &NewIncident) -> BoundQuery {
    BoundQuery::new(
        "INSERT INTO Incidents \
         (case_number, date_time, code, incident, police_grid, neighborhood_number, block) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        vec![
            SqlParam::Text(incident.case_number.clone()),
            SqlParam::Text(incident.date_time_text()),
            SqlParam::Integer(incident.code),
            SqlParam::Text(incident.incident.clone()),
            SqlParam::Integer(incident.police_grid),
            SqlParam::Integer(incident.neighborhood_number),
            SqlParam::Text(incident.block.clone()),
        ],
    )
}

pub fn delete_incident(case_number: &str) -> BoundQuery {
    let mut predicates = Predicates::new();
    predicates.equals(Column::CaseNumber, SqlParam::Text(case_number.to_string()));
    let (clause, params) = predicates.into_parts();
    BoundQuery::new(format!("DELETE FROM Incidents WHERE {}", clause), params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_predicates_render_tautology() {
        let predicates = Predicates::new();
        assert!(predicates.is_empty());
        assert_eq!(predicates.render(), "1=1");
    }

    #[test]
    fn test_select_codes_without_filter() {
        let query = select_codes(&CodeFilter::default());
        assert_eq!(
            query.sql(),
            "SELECT code, incident FROM Codes WHERE 1=1 ORDER BY code"
        );
        assert!(query.params().is_empty());
    }

    #[test]
    fn test_select_codes_in_list() {
        let query = select_codes(&CodeFilter {
            codes: Some(vec![10, 20]),
        });
        assert!(query.sql().contains("WHERE code IN (?, ?)"));
        assert_eq!(
            query.params(),
            &[SqlParam::Integer(10), SqlParam::Integer(20)]
        );
    }

    #[test]
    fn test_select_neighborhoods_in_list() {
        let query = select_neighborhoods(&NeighborhoodFilter {
            ids: Some(vec![4]),
        });
        assert!(query.sql().contains("WHERE neighborhood_number IN (?)"));
        assert_eq!(query.placeholder_count(), query.params().len());
    }

    #[test]
    fn test_select_incidents_predicate_order() {
        let filter = IncidentFilter {
            start_date: NaiveDate::from_ymd_opt(2022, 5, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
            end_date: NaiveDate::from_ymd_opt(2022, 5, 31)
                .and_then(|d| d.and_hms_opt(23, 59, 59)),
            codes: Some(vec![600]),
            grids: Some(vec![87, 88]),
            neighborhoods: Some(vec![7]),
            limit: 25,
        };
        let query = select_incidents(&filter);
        assert!(query.sql().contains(
            "WHERE date_time >= ? AND date_time <= ? AND code IN (?) \
             AND police_grid IN (?, ?) AND neighborhood_number IN (?) \
             ORDER BY date_time DESC"
        ));
        assert!(query.sql().ends_with("LIMIT ?"));
        assert_eq!(
            query.params(),
            &[
                SqlParam::Text("2022-05-01T00:00:00".to_string()),
                SqlParam::Text("2022-05-31T23:59:59".to_string()),
                SqlParam::Integer(600),
                SqlParam::Integer(87),
                SqlParam::Integer(88),
                SqlParam::Integer(7),
                SqlParam::BigInt(25),
            ]
        );
    }

    #[test]
    fn test_select_incidents_default_has_only_limit() {
        let query = select_incidents(&IncidentFilter::default());
        assert!(query.sql().contains("WHERE 1=1 ORDER BY"));
        assert_eq!(query.params(), &[SqlParam::BigInt(1000)]);
    }

    #[test]
    fn test_any_of_empty_matches_nothing() {
        let mut predicates = Predicates::new();
        predicates.any_of(Column::Code, &[]);
        assert_eq!(predicates.render(), "0 = 1");
        assert_eq!(predicates.param_count(), 0);
    }

    #[test]
    fn test_case_number_is_bound_not_interpolated() {
        let hostile = "1' OR '1'='1";
        let query = delete_incident(hostile);
        assert_eq!(query.sql(), "DELETE FROM Incidents WHERE case_number = ?");
        assert!(!query.sql().contains(hostile));
        assert_eq!(query.params(), &[SqlParam::Text(hostile.to_string())]);

        let exists = incident_exists(hostile);
        assert!(!exists.sql().contains(hostile));
        assert_eq!(exists.placeholder_count(), 1);
    }

    #[test]
    fn test_insert_binds_every_column() {
        let incident = NewIncident {
            case_number: "22000001".to_string(),
            date_time: NaiveDate::from_ymd_opt(2022, 5, 31)
                .and_then(|d| d.and_hms_opt(8, 15, 0))
                .unwrap(),
            code: 600,
            incident: "Theft".to_string(),
            police_grid: 87,
            neighborhood_number: 7,
            block: "98X UNIVERSITY AV W".to_string(),
        };
        let query = insert_incident(&incident);
        assert_eq!(query.placeholder_count(), 7);
        assert_eq!(query.params().len(), 7);
        assert_eq!(
            query.params()[1],
            SqlParam::Text("2022-05-31T08:15:00".to_string())
        );
    }
}
