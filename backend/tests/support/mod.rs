//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::NaiveDateTime;
use stpaul_crime::api::{NewIncident, DATE_TIME_FORMAT};
use stpaul_crime::db::{BoundQuery, CrimeRepository, SqlParam, SqliteConfig, SqliteRepository};
use tempfile::TempDir;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Build an incident from its stored `date_time` text.
pub fn incident(
    case_number: &str,
    date_time: &str,
    code: i32,
    description: &str,
    police_grid: i32,
    neighborhood_number: i32,
    block: &str,
) -> NewIncident {
    NewIncident {
        case_number: case_number.to_string(),
        date_time: NaiveDateTime::parse_from_str(date_time, DATE_TIME_FORMAT)
            .expect("seed date_time"),
        code,
        incident: description.to_string(),
        police_grid,
        neighborhood_number,
        block: block.to_string(),
    }
}

/// Incidents in the seeded database, newest first.
///
/// The first two share a timestamp and are ordered by case number.
pub fn seed_incidents() -> Vec<NewIncident> {
    vec![
        incident("19245021", "2019-10-30T23:57:08", 600, "Theft", 95, 4, "79X 6 ST E"),
        incident("19245020", "2019-10-30T23:57:08", 700, "Auto Theft", 95, 4, "79X 6 ST E"),
        incident("19245016", "2019-10-30T23:53:20", 600, "Theft", 87, 7, "THOMAS AV  & VICTORIA"),
        incident("19245014", "2019-10-30T08:51:17", 9954, "Proactive Police Visit", 166, 17, "5X 4 ST E"),
        incident("18000001", "2018-01-01T00:15:00", 110, "Murder", 10, 1, "1X OLD HUDSON RD"),
    ]
}

/// Create an empty on-disk database with the bundled schema.
pub fn empty_repository() -> (TempDir, SqliteRepository) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = SqliteConfig::with_path(dir.path().join("crime.sqlite3")).create_schema(true);
    let repo = SqliteRepository::new(config).expect("open repository");
    (dir, repo)
}

/// Create an on-disk database holding the reference tables and [`seed_incidents`].
///
/// The `TempDir` must outlive the repository.
pub async fn seeded_repository() -> (TempDir, SqliteRepository) {
    let (dir, repo) = empty_repository();

    for (code, description) in [
        (110, "Murder"),
        (600, "Theft"),
        (700, "Auto Theft"),
        (9954, "Proactive Police Visit"),
    ] {
        repo.execute(BoundQuery::new(
            "INSERT INTO Codes (code, incident) VALUES (?, ?)",
            vec![SqlParam::Integer(code), SqlParam::Text(description.to_string())],
        ))
        .await
        .expect("seed code");
    }

    for (number, name) in [
        (1, "Conway/Battlecreek/Highwood"),
        (4, "Dayton's Bluff"),
        (7, "Thomas/Dale(Frogtown)"),
        (17, "Capitol River"),
    ] {
        repo.execute(BoundQuery::new(
            "INSERT INTO Neighborhoods (neighborhood_number, neighborhood_name) VALUES (?, ?)",
            vec![SqlParam::Integer(number), SqlParam::Text(name.to_string())],
        ))
        .await
        .expect("seed neighborhood");
    }

    for incident in seed_incidents() {
        repo.create_incident(&incident).await.expect("seed incident");
    }

    (dir, repo)
}
