//! Error types produced by the ingest crate.
//!
//! Every variant describes a caller input problem: nothing in this crate
//! touches storage, so there is no infrastructure failure class here.
//!
//! # HTTP Status Code Mapping
//!
//! ```rust
//! use ingest::IngestError;
//!
//! fn to_http_status(error: &IngestError) -> u16 {
//!     match error {
//!         IngestError::InvalidInput
//!         | IngestError::MissingField(_)
//!         | IngestError::InvalidTenant(_)
//!         | IngestError::MalformedResponse(_) => 400,
//!         _ => 500,
//!     }
//! }
//!
//! assert_eq!(to_http_status(&IngestError::MissingField("user_id".into())), 400);
//! ```
use thiserror::Error;

/// Errors raised while turning a request body into a storable [`LogRecord`](crate::LogRecord).
///
/// The enum is `#[non_exhaustive]`; callers matching on it need a catch-all arm.
///
/// ```rust
/// use ingest::IngestError;
///
/// let err = IngestError::MissingField("api_type".into());
/// assert_eq!(err.to_string(), "Missing key: api_type");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    /// The body was not JSON, or was JSON but not a single object.
    #[error("Invalid input")]
    InvalidInput,

    /// A required key was absent. Carries the first missing key in declared order.
    #[error("Missing key: {0}")]
    MissingField(String),

    /// `app_name` is not one of the registered tenants.
    #[error("Invalid app_name: {0}")]
    InvalidTenant(String),

    /// `api_response` was a string that stayed unparseable after stripping the
    /// `Optional(` wrapper. Carries the JSON parser's message.
    #[error("Invalid JSON format for api_response: {0}")]
    MalformedResponse(String),
}
