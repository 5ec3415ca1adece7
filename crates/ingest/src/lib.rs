//! applog ingest layer
//!
//! This is where client log records enter the system. A request body goes in,
//! a [`LogRecord`] that is safe to persist comes out.
//!
//! ## What we do here
//!
//! - **Validate presence** - the body must be one JSON object carrying all
//!   eight required keys ([`REQUIRED_FIELDS`]).
//! - **Resolve the tenant** - `app_name` must name one of the fixed
//!   [`Tenant`]s. The same resolver is used by the query side.
//! - **Repair `api_response`** - strings of the form `Optional({...})` are
//!   stripped and parsed into structured JSON, or the record is rejected.
//! - **Stamp the record** - the acceptance time is supplied by the caller
//!   (the service owns the clock) and overrides anything the client sent.
//!
//! Nothing here does I/O. Persisting the record is the store's job.
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use ingest::{normalize_record, Tenant};
//! use serde_json::json;
//!
//! let body = json!({
//!     "app_name": "zig",
//!     "api_type": "search",
//!     "api_response": "Optional({\"hits\": 3})",
//!     "mobile_type": "ios",
//!     "input": "coffee",
//!     "user_id": "u-1",
//!     "user_name": "Ada",
//!     "current_location": "51.5,-0.1"
//! });
//!
//! let record = normalize_record(body, Utc::now()).unwrap();
//! assert_eq!(record.app_name, Tenant::Zig);
//! assert_eq!(record.api_response, json!({"hits": 3}));
//! ```
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{info, warn, Level};

mod error;
mod payload;
mod tenant;
mod types;
mod validate;

pub use crate::error::IngestError;
pub use crate::payload::{normalize_api_response, strip_optional_wrapper};
pub use crate::tenant::Tenant;
pub use crate::types::{ApiResponse, LogRecord};
pub use crate::validate::{validate_record, REQUIRED_FIELDS};

/// Keys owned by the service or the store. Client values for them are dropped.
const RESERVED_FIELDS: [&str; 2] = ["timestamp", "record_id"];

/// Parse a raw request body. Anything that is not JSON is `InvalidInput`.
pub fn parse_body(raw: &[u8]) -> Result<Value, IngestError> {
    serde_json::from_slice(raw).map_err(|_| IngestError::InvalidInput)
}

/// Validate a request body, resolve its tenant, repair `api_response` and stamp
/// it with `received_at`.
///
/// Checks run in a fixed order (presence, tenant, payload) so a given body
/// always fails the same way.
pub fn normalize_record(body: Value, received_at: DateTime<Utc>) -> Result<LogRecord, IngestError> {
    let start = Instant::now();
    let app_hint = body.get("app_name").cloned();

    let span = tracing::span!(Level::INFO, "ingest.normalize");
    let _guard = span.enter();

    match normalize_inner(body, received_at) {
        Ok(record) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(
                tenant = %record.app_name,
                extra_fields = record.extra.len(),
                elapsed_micros,
                "ingest_success"
            );
            Ok(record)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(
                app_name = ?app_hint,
                error = %err,
                elapsed_micros,
                "ingest_failure"
            );
            Err(err)
        }
    }
}

fn normalize_inner(body: Value, received_at: DateTime<Utc>) -> Result<LogRecord, IngestError> {
    validate_record(&body)?;
    let Value::Object(mut fields) = body else {
        return Err(IngestError::InvalidInput);
    };

    let app_name = Tenant::resolve_value(&take_field(&mut fields, "app_name")?)?;
    let api_response =
        normalize_api_response(ApiResponse::from(take_field(&mut fields, "api_response")?))?;

    let api_type = take_field(&mut fields, "api_type")?;
    let mobile_type = take_field(&mut fields, "mobile_type")?;
    let input = take_field(&mut fields, "input")?;
    let user_id = take_field(&mut fields, "user_id")?;
    let user_name = take_field(&mut fields, "user_name")?;
    let current_location = take_field(&mut fields, "current_location")?;

    for reserved in RESERVED_FIELDS {
        fields.remove(reserved);
    }

    Ok(LogRecord {
        app_name,
        api_type,
        api_response,
        mobile_type,
        input,
        user_id,
        user_name,
        current_location,
        timestamp: received_at,
        extra: fields,
    })
}

fn take_field(fields: &mut Map<String, Value>, key: &str) -> Result<Value, IngestError> {
    fields
        .remove(key)
        .ok_or_else(|| IngestError::MissingField(key.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;

    use super::*;

    fn fixed_timestamp() -> DateTime<Utc> {
        let Some(date_time) = NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(8, 30, 0))
        else {
            panic!("invalid date components");
        };
        Utc.from_utc_datetime(&date_time)
    }

    fn base_body() -> Value {
        json!({
            "app_name": "ecolane",
            "api_type": "booking",
            "api_response": {"status": 200},
            "mobile_type": "android",
            "input": {"from": "A", "to": "B"},
            "user_id": "rider-7",
            "user_name": "Sam",
            "current_location": {"lat": 40.4, "lng": -79.9}
        })
    }

    #[test]
    fn test_parse_body_rejects_non_json() {
        assert_eq!(parse_body(b"not json"), Err(IngestError::InvalidInput));
        assert_eq!(parse_body(b""), Err(IngestError::InvalidInput));
        assert_eq!(parse_body(br#"{"a":1}"#), Ok(json!({"a": 1})));
    }

    #[test]
    fn test_normalize_structured_record() {
        let record = normalize_record(base_body(), fixed_timestamp()).expect("should normalize");
        assert_eq!(record.app_name, Tenant::Ecolane);
        assert_eq!(record.api_response, json!({"status": 200}));
        assert_eq!(record.current_location, json!({"lat": 40.4, "lng": -79.9}));
        assert_eq!(record.timestamp, fixed_timestamp());
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_normalize_repairs_optional_string() {
        let mut body = base_body();
        body["api_response"] = json!(r#"Optional({"k":1})"#);
        let record = normalize_record(body, fixed_timestamp()).expect("should normalize");
        assert_eq!(record.api_response, json!({"k": 1}));
    }

    #[test]
    fn test_client_timestamp_and_record_id_are_discarded() {
        let mut body = base_body();
        body["timestamp"] = json!("1999-12-31T23:59:59Z");
        body["record_id"] = json!("client-chosen");
        body["build"] = json!(512);
        let record = normalize_record(body, fixed_timestamp()).expect("should normalize");
        assert_eq!(record.timestamp, fixed_timestamp());
        assert!(!record.extra.contains_key("timestamp"));
        assert!(!record.extra.contains_key("record_id"));
        assert_eq!(record.extra.get("build"), Some(&json!(512)));
    }

    #[test]
    fn test_validation_runs_before_tenant_resolution() {
        let body = json!({"app_name": "notarealapp"});
        assert_eq!(
            normalize_record(body, fixed_timestamp()),
            Err(IngestError::MissingField("api_type".into()))
        );
    }

    #[test]
    fn test_tenant_resolution_runs_before_payload_repair() {
        let mut body = base_body();
        body["app_name"] = json!("notarealapp");
        body["api_response"] = json!("Optional(garbage");
        assert_eq!(
            normalize_record(body, fixed_timestamp()),
            Err(IngestError::InvalidTenant("notarealapp".into()))
        );
    }

    #[test]
    fn test_malformed_response_is_rejected() {
        let mut body = base_body();
        body["api_response"] = json!("Optional(garbage)");
        assert!(matches!(
            normalize_record(body, fixed_timestamp()),
            Err(IngestError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_non_object_body_is_invalid_input() {
        assert_eq!(
            normalize_record(json!([base_body()]), fixed_timestamp()),
            Err(IngestError::InvalidInput)
        );
    }
}
