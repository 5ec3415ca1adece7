//! Repair of the `api_response` field.
//!
//! Some upstream clients serialize an optional-wrapped structure as the string
//! `Optional({...})`. The repair is a plain textual strip of every `Optional(`
//! and every `)` followed by a JSON parse. It is not balanced-paren parsing:
//! a `)` inside a legitimate nested string is stripped as well.
//!
//! # Payload Flow
//!
//! ```text
//! ApiResponse (boundary)
//!        │
//!        ├── Structured(value) ──────────────────────► value
//!        │
//!        └── RawString(text)
//!               │  strip "Optional(" and ")"
//!               ▼
//!            serde_json::from_str
//!               │
//!               ├── Ok(value) ───────────────────────► value
//!               └── Err ─────────────► IngestError::MalformedResponse
//! ```
use serde_json::Value;

use crate::error::IngestError;
use crate::types::ApiResponse;

const OPTIONAL_PREFIX: &str = "Optional(";
const OPTIONAL_SUFFIX: &str = ")";

/// Normalize an `api_response` into a structured value.
///
/// ```rust
/// use ingest::{normalize_api_response, ApiResponse};
/// use serde_json::json;
///
/// let raw = ApiResponse::RawString(r#"Optional({"k":1})"#.into());
/// assert_eq!(normalize_api_response(raw).unwrap(), json!({"k": 1}));
///
/// let structured = ApiResponse::Structured(json!([1, 2, 3]));
/// assert_eq!(normalize_api_response(structured).unwrap(), json!([1, 2, 3]));
/// ```
pub fn normalize_api_response(response: ApiResponse) -> Result<Value, IngestError> {
    match response {
        ApiResponse::Structured(value) => Ok(value),
        ApiResponse::RawString(text) => {
            let stripped = strip_optional_wrapper(&text);
            serde_json::from_str(&stripped)
                .map_err(|err| IngestError::MalformedResponse(err.to_string()))
        }
    }
}

/// Remove every occurrence of `Optional(` and every occurrence of `)`.
///
/// `Optional(` goes first so its own `(` never survives to be paired with
/// anything.
pub fn strip_optional_wrapper(text: &str) -> String {
    text.replace(OPTIONAL_PREFIX, "").replace(OPTIONAL_SUFFIX, "")
}
