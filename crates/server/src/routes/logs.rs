use crate::error::ServerResult;
use crate::state::ServerState;
use applog::{LogQuery, RecordId, StoredLog};
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task;

/// Response from a successful `POST /logs`
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLogResponse {
    pub message: String,
    pub record_id: RecordId,
}

/// Raw query-string pairs in request order.
///
/// Parameters may repeat; the first occurrence of a key wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn first(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn to_log_query(&self) -> LogQuery {
        LogQuery {
            app_name: self.first("app_name"),
            user_id: self.first("user_id"),
            from: self.first("from"),
            to: self.first("to"),
        }
    }
}

impl From<Vec<(String, String)>> for QueryParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

fn query_params(
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ServerResult<QueryParams> {
    let Query(pairs) = params?;
    Ok(QueryParams::from(pairs))
}

/// Ingest one log record
///
/// The body is taken as raw bytes so that non-JSON input is reported as
/// `INVALID_INPUT` in the usual error envelope rather than as an extractor
/// rejection.
pub async fn create_log(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> ServerResult<(StatusCode, Json<CreateLogResponse>)> {
    let ingestion = state.ingestion.clone();
    let record_id = task::spawn_blocking(move || ingestion.ingest(&body)).await??;

    Ok((
        StatusCode::CREATED,
        Json(CreateLogResponse {
            message: "Log created successfully".to_string(),
            record_id,
        }),
    ))
}

/// List a tenant's logs, optionally narrowed by user and day range
pub async fn list_logs(
    State(state): State<Arc<ServerState>>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ServerResult<Json<Vec<StoredLog>>> {
    let query = query_params(params)?.to_log_query();
    let queries = state.queries.clone();
    let logs = task::spawn_blocking(move || queries.list_logs(&query)).await??;
    Ok(Json(logs))
}

/// List a tenant's logs across all dates, optionally narrowed by user
pub async fn list_all_users(
    State(state): State<Arc<ServerState>>,
    Path(app_name): Path<String>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ServerResult<Json<Vec<StoredLog>>> {
    let user_id = query_params(params)?.first("user_id");
    let queries = state.queries.clone();
    let logs = task::spawn_blocking(move || {
        queries.list_all_users(&app_name, user_id.as_deref())
    })
    .await??;
    Ok(Json(logs))
}
