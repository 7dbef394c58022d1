//! Configuration loading from the environment and from TOML files.

mod support;

use std::io::Write;
use std::path::PathBuf;

use stpaul_crime::db::{RepositoryConfig, SqliteConfig};
use support::with_scoped_env;

const SQLITE_VARS: [&str; 6] = [
    "DATABASE_PATH",
    "CRIME_DB_PATH",
    "SQLITE_POOL_MAX",
    "SQLITE_CONN_TIMEOUT_SEC",
    "SQLITE_BUSY_TIMEOUT_MS",
    "SQLITE_CREATE_SCHEMA",
];

fn cleared_with<'a>(set: &[(&'a str, &'a str)]) -> Vec<(&'a str, Option<&'a str>)> {
    let mut changes: Vec<(&str, Option<&str>)> = SQLITE_VARS.iter().map(|k| (*k, None)).collect();
    for (key, value) in set {
        changes.retain(|(k, _)| k != key);
        changes.push((*key, Some(*value)));
    }
    changes
}

#[test]
fn test_from_env_requires_path() {
    let result = with_scoped_env(&cleared_with(&[]), SqliteConfig::from_env);
    assert!(result.is_err());
}

#[test]
fn test_from_env_defaults() {
    let config = with_scoped_env(
        &cleared_with(&[("DATABASE_PATH", "/data/crime.sqlite3")]),
        SqliteConfig::from_env,
    )
    .unwrap();

    assert_eq!(config.database_path, PathBuf::from("/data/crime.sqlite3"));
    assert_eq!(config.max_pool_size, 1);
    assert_eq!(config.connection_timeout_sec, 30);
    assert_eq!(config.busy_timeout_ms, 5000);
    assert!(!config.create_schema);
}

#[test]
fn test_from_env_fallback_path_and_overrides() {
    let config = with_scoped_env(
        &cleared_with(&[
            ("CRIME_DB_PATH", "crime.sqlite3"),
            ("SQLITE_POOL_MAX", "3"),
            ("SQLITE_BUSY_TIMEOUT_MS", "100"),
            ("SQLITE_CREATE_SCHEMA", "yes"),
        ]),
        SqliteConfig::from_env,
    )
    .unwrap();

    assert_eq!(config.database_path, PathBuf::from("crime.sqlite3"));
    assert_eq!(config.max_pool_size, 3);
    assert_eq!(config.busy_timeout_ms, 100);
    assert!(config.create_schema);
}

#[test]
fn test_from_env_ignores_unusable_numbers() {
    let config = with_scoped_env(
        &cleared_with(&[
            ("DATABASE_PATH", "crime.sqlite3"),
            ("SQLITE_POOL_MAX", "0"),
            ("SQLITE_CONN_TIMEOUT_SEC", "soon"),
        ]),
        SqliteConfig::from_env,
    )
    .unwrap();

    assert_eq!(config.max_pool_size, 1);
    assert_eq!(config.connection_timeout_sec, 30);
}

#[test]
fn test_repository_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[sqlite]\ndatabase_path = \"db/stpaul_crime.sqlite3\"\n\n[query]\ndefault_limit = 200"
    )
    .unwrap();

    let config = RepositoryConfig::from_file(file.path()).unwrap();
    assert_eq!(
        config.to_sqlite_config().database_path,
        PathBuf::from("db/stpaul_crime.sqlite3")
    );
    assert_eq!(config.query_defaults().default_limit, 200);
}

#[test]
fn test_repository_config_missing_file() {
    assert!(RepositoryConfig::from_file("/definitely/not/here/crime.toml").is_err());
}
