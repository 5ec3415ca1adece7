//! Presence checks for inbound log records.
//!
//! Only the shape of the body and the presence of each required key are
//! checked here. Values are not inspected: `null` and `""` both count as
//! present.
use serde_json::{Map, Value};

use crate::error::IngestError;

/// Keys every record must carry, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "app_name",
    "api_type",
    "api_response",
    "mobile_type",
    "input",
    "user_id",
    "user_name",
    "current_location",
];

/// Check that `body` is a JSON object carrying every key in [`REQUIRED_FIELDS`].
///
/// The first absent key (in declared order) is reported, so a given body
/// always produces the same error.
///
/// ```rust
/// use ingest::{validate_record, IngestError};
/// use serde_json::json;
///
/// let body = json!({"app_name": "zig", "api_type": "GET"});
/// assert_eq!(
///     validate_record(&body).unwrap_err(),
///     IngestError::MissingField("api_response".into())
/// );
/// assert_eq!(validate_record(&json!([1, 2])).unwrap_err(), IngestError::InvalidInput);
/// ```
pub fn validate_record(body: &Value) -> Result<&Map<String, Value>, IngestError> {
    let Value::Object(fields) = body else {
        return Err(IngestError::InvalidInput);
    };
    if let Some(missing) = REQUIRED_FIELDS.iter().find(|key| !fields.contains_key(**key)) {
        return Err(IngestError::MissingField((*missing).to_string()));
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_body() -> Value {
        json!({
            "app_name": "zig",
            "api_type": "search",
            "api_response": {"ok": true},
            "mobile_type": "ios",
            "input": "query",
            "user_id": "u-1",
            "user_name": "Ada",
            "current_location": "51.5,-0.1"
        })
    }

    #[test]
    fn test_complete_body_passes() {
        let body = complete_body();
        let fields = validate_record(&body).expect("complete body should validate");
        assert_eq!(fields.len(), REQUIRED_FIELDS.len());
    }

    #[test]
    fn test_null_and_empty_values_count_as_present() {
        let mut body = complete_body();
        body["input"] = Value::Null;
        body["user_name"] = json!("");
        assert!(validate_record(&body).is_ok());
    }

    #[test]
    fn test_reports_first_missing_key_in_declared_order() {
        for (idx, key) in REQUIRED_FIELDS.iter().enumerate() {
            let mut body = complete_body();
            // Drop this key and every key after it; the error must name this one.
            for later in &REQUIRED_FIELDS[idx..] {
                body.as_object_mut().unwrap().remove(*later);
            }
            assert_eq!(
                validate_record(&body).unwrap_err(),
                IngestError::MissingField((*key).to_string())
            );
        }
    }

    #[test]
    fn test_missing_key_ignores_other_present_keys() {
        let body = json!({
            "current_location": "x",
            "user_name": "x",
            "api_response": "x",
        });
        assert_eq!(
            validate_record(&body).unwrap_err(),
            IngestError::MissingField("app_name".into())
        );
    }

    #[test]
    fn test_non_object_bodies_are_invalid_input() {
        for body in [json!([complete_body()]), json!("text"), json!(7), Value::Null] {
            assert_eq!(validate_record(&body).unwrap_err(), IngestError::InvalidInput);
        }
    }
}
