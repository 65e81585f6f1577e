//! HTTP API.
//!
//! Analysis routes (`/doctor/analyze`, `/patient/explain`), `/health`, and
//! the dashboard CRUD routes. The router is composable: `api_router()`
//! returns a `Router` that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;
pub mod uploads;

pub use router::api_router;
pub use server::{serve, serve_on};
pub use types::ApiContext;
