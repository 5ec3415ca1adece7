use ingest::IngestError;
use store::StoreError;
use thiserror::Error;

/// Everything the ingestion and query services can reject a request with.
///
/// `Storage` is the only infrastructure failure; every other variant is the
/// caller's fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LogServiceError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("Invalid date format for {field}: {value:?} (expected YYYY-MM-DD)")]
    InvalidDateFormat { field: &'static str, value: String },
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl LogServiceError {
    /// True for failures caused by the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, LogServiceError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_errors_display_transparently() {
        let err = LogServiceError::from(IngestError::MissingField("user_id".into()));
        assert_eq!(err.to_string(), "Missing key: user_id");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_storage_is_the_only_server_error() {
        let err = LogServiceError::from(StoreError::backend("io"));
        assert!(!err.is_client_error());
        let err = LogServiceError::InvalidDateFormat {
            field: "from",
            value: "yesterday".into(),
        };
        assert!(err.is_client_error());
        assert!(err.to_string().contains("yesterday"));
    }
}
