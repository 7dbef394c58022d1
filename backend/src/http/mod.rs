//! HTTP server module for the crime query service.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Query-string and JSON body extraction                  │
//! │  - Error to status mapping                                │
//! │  - CORS, compression, request tracing                     │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (db::services)                             │
//! │  - Filter parsing, body validation                        │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - SqliteRepository                                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Endpoints
//!
//! | Method | Path               | Success                    |
//! |--------|--------------------|----------------------------|
//! | GET    | `/health`          | `{status, version, database}` |
//! | GET    | `/codes`           | array of codes             |
//! | GET    | `/neighborhoods`   | array of neighborhoods     |
//! | GET    | `/incidents`       | array of incidents         |
//! | PUT    | `/new-incident`    | text confirmation          |
//! | DELETE | `/remove-incident` | text confirmation          |

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
