//! Multi-tenant client log ingestion and retrieval.
//!
//! This crate wires the normalizer from `applog-ingest` to the per-tenant
//! stores from `applog-store` and exposes the two operations the HTTP layer
//! needs:
//!
//! - [`IngestionService::ingest`] validates a raw body, resolves its tenant,
//!   repairs `api_response`, stamps it with the service clock and persists it.
//! - [`QueryService::list_logs`] / [`QueryService::list_all_users`] resolve a
//!   tenant, build a filter and return records ordered by timestamp.
//!
//! ```
//! use std::sync::Arc;
//! use applog::{IngestionService, LogQuery, QueryService, SystemClock, TenantStores};
//!
//! let stores = Arc::new(TenantStores::in_memory());
//! let ingestion = IngestionService::new(stores.clone(), Arc::new(SystemClock));
//! let queries = QueryService::new(stores);
//!
//! let body = br#"{
//!     "app_name": "zig", "api_type": "search", "api_response": "Optional({\"hits\":2})",
//!     "mobile_type": "android", "input": "tea", "user_id": "u-1",
//!     "user_name": "Ada", "current_location": null
//! }"#;
//! let record_id = ingestion.ingest(body).unwrap();
//!
//! let logs = queries.list_logs(&LogQuery::for_app("zig").with_user_id("u-1")).unwrap();
//! assert_eq!(logs[0].record_id, record_id);
//! ```

mod clock;
mod error;
mod query;
mod service;

pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::error::LogServiceError;
pub use crate::query::{DATE_FORMAT, LogQuery, day_range, parse_day};
pub use crate::service::{IngestionService, QueryService};

pub use ingest::{
    ApiResponse, IngestError, LogRecord, REQUIRED_FIELDS, Tenant, normalize_api_response,
    normalize_record, parse_body, strip_optional_wrapper, validate_record,
};
pub use store::{
    BackendConfig, InMemoryBackend, LogBackend, LogFilter, RecordId, StoreError, StoredLog,
    TenantStores, TimeRange,
};
