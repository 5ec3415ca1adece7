//! applog server - HTTP REST API for multi-tenant client logs
//!
//! Clients post structured event records tagged with their application
//! (`app_name`); operators list them back per application, filtered by user
//! and day range. Each application's records live in their own store.
//!
//! # Features
//!
//! - **Storage**: in-memory stores, or one redb file when `database_path` is set
//! - **Middleware**: compression, CORS, request ID tracking, structured logging
//! - **Configuration**: environment variable and file-based configuration
//! - **Error Handling**: JSON error envelope with stable error codes
//! - **Graceful Shutdown**: SIGTERM and Ctrl+C
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - plain-text liveness (`Hello World!`)
//! - `GET /health` - liveness probe
//! - `GET /ready` - readiness probe, reports the storage backend
//! - `POST /logs` - ingest one record, `201` with its `record_id`
//! - `GET /logs?app_name=&user_id=&from=&to=` - filtered listing, dates as `YYYY-MM-DD`
//! - `GET /{app_name}/allusers?user_id=` - listing without a date filter
//!
//! Errors use `{"error": {"code": "...", "message": "..."}}`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
