//! # St. Paul Crime Query Service
//!
//! HTTP query interface over a small relational dataset of crime incidents,
//! neighborhoods, and incident codes.
//!
//! ## Features
//!
//! - **Filtered reads**: date range, code, police grid and neighborhood filters
//!   composed into a parameterized SQL predicate
//! - **Guarded writes**: create rejects duplicate case numbers, delete reports
//!   unknown case numbers
//! - **HTTP API**: RESTful endpoints served by Axum
//!
//! ## Architecture
//!
//! - [`api`]: Resource types and request bodies
//! - [`db`]: Query builder, repository pattern, and SQLite persistence layer
//! - [`services`]: Write-path validation
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
