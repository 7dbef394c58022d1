//! Request-level business rules that sit in front of the database layer.
//!
//! Query-string filters are parsed in [`crate::db::query`]; request bodies
//! for writes are checked here.

pub mod validation;

pub use validation::{validate_case_number, validate_new_incident, ValidationError};
