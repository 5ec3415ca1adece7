//! API route handlers
//!
//! - `health`: liveness and readiness probes
//! - `logs`: log ingestion and tenant log listings

pub mod health;
pub mod logs;

use crate::error::ServerError;

/// Plain-text liveness check at `GET /`.
pub async fn hello() -> &'static str {
    "Hello World!"
}

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
