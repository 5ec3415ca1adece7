use applog::LogServiceError;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ingest::IngestError;
use serde::{Deserialize, Serialize};

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Service(#[from] LogServiceError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Service(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ServerError::Service(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServerError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::Service(LogServiceError::Ingest(err)) => match err {
                IngestError::InvalidInput => "INVALID_INPUT",
                IngestError::MissingField(_) => "MISSING_FIELD",
                IngestError::InvalidTenant(_) => "INVALID_APP_NAME",
                IngestError::MalformedResponse(_) => "MALFORMED_API_RESPONSE",
                _ => "INVALID_INPUT",
            },
            ServerError::Service(LogServiceError::InvalidDateFormat { .. }) => {
                "INVALID_DATE_FORMAT"
            }
            ServerError::Service(LogServiceError::Storage(_)) => "STORAGE_ERROR",
            ServerError::Service(_) | ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        };

        if status.is_server_error() {
            tracing::error!(code = %body.error.code, error = %body.error.message, "request failed");
        }

        (status, Json(body)).into_response()
    }
}

impl From<IngestError> for ServerError {
    fn from(err: IngestError) -> Self {
        ServerError::Service(err.into())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(err: QueryRejection) -> Self {
        tracing::debug!(error = %err, "rejected query string");
        IngestError::InvalidInput.into()
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("blocking task failed: {err}"))
    }
}
