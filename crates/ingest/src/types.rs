//! Core data model types for the ingest crate.
//!
//! ```text
//! request body (serde_json::Value)
//! ├── app_name          ──► Tenant
//! ├── api_response      ──► ApiResponse ──► normalized Value
//! ├── api_type, mobile_type, input,
//! │   user_id, user_name, current_location ──► passed through
//! └── any other keys    ──► extra (passed through)
//!
//!         ↓ normalize_record()
//!
//! LogRecord (+ service-assigned timestamp)
//! ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tenant::Tenant;

/// `api_response` as it arrives at the boundary.
///
/// Only the `Structured` form is ever stored; a `RawString` must go through
/// [`normalize_api_response`](crate::normalize_api_response) first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    Structured(Value),
    RawString(String),
}

impl From<Value> for ApiResponse {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => ApiResponse::RawString(text),
            other => ApiResponse::Structured(other),
        }
    }
}

/// A validated, normalized client event ready for storage.
///
/// The pass-through fields are kept as raw JSON values: clients send strings,
/// numbers or objects and they are stored exactly as sent. Keys outside the
/// required set live in `extra` and are flattened back on serialization, so a
/// stored record looks like the body the client posted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub app_name: Tenant,
    pub api_type: Value,
    pub api_response: Value,
    pub mobile_type: Value,
    pub input: Value,
    pub user_id: Value,
    pub user_name: Value,
    pub current_location: Value,
    /// Acceptance time, assigned by the service. Never taken from the client.
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogRecord {
    /// Exact match against a `user_id` query parameter. Query parameters are
    /// strings, so a numeric `user_id` in a record never matches.
    pub fn has_user_id(&self, user_id: &str) -> bool {
        self.user_id.as_str() == Some(user_id)
    }
}
