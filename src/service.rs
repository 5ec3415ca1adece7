//! The two request-level operations: accept one log record, and list a
//! tenant's records.
//!
//! Both services are cheap to clone and share the same `Arc<TenantStores>`.
//! Store calls are synchronous; async callers should run them on a blocking
//! pool.

use std::sync::Arc;
use std::time::Instant;

use ingest::{Tenant, normalize_record, parse_body};
use serde_json::Value;
use store::{LogFilter, RecordId, StoredLog, TenantStores};
use tracing::{error, info};

use crate::clock::Clock;
use crate::error::LogServiceError;
use crate::query::LogQuery;

/// Validates, normalizes, stamps and persists incoming records.
#[derive(Clone)]
pub struct IngestionService {
    stores: Arc<TenantStores>,
    clock: Arc<dyn Clock>,
}

impl IngestionService {
    pub fn new(stores: Arc<TenantStores>, clock: Arc<dyn Clock>) -> Self {
        Self { stores, clock }
    }

    /// Accept a raw request body.
    ///
    /// Nothing touches the store unless parsing, validation, tenant resolution
    /// and payload repair all succeed.
    pub fn ingest(&self, raw: &[u8]) -> Result<RecordId, LogServiceError> {
        let body = parse_body(raw)?;
        self.ingest_value(body)
    }

    /// Accept an already-parsed body.
    pub fn ingest_value(&self, body: Value) -> Result<RecordId, LogServiceError> {
        let record = normalize_record(body, self.clock.now())?;
        let tenant = record.app_name;

        match self.stores.for_tenant(tenant).insert(&record) {
            Ok(record_id) => {
                info!(tenant = %tenant, record_id = %record_id, "log_persisted");
                Ok(record_id)
            }
            Err(err) => {
                error!(tenant = %tenant, error = %err, "log_persist_failed");
                Err(err.into())
            }
        }
    }
}

/// Read side: filtered listings of one tenant's records.
///
/// Results are ordered by `timestamp`, then `record_id`, so repeating a query
/// without intervening writes returns the same sequence.
#[derive(Clone)]
pub struct QueryService {
    stores: Arc<TenantStores>,
}

impl QueryService {
    pub fn new(stores: Arc<TenantStores>) -> Self {
        Self { stores }
    }

    /// `GET /logs`: tenant plus optional user and day range.
    pub fn list_logs(&self, query: &LogQuery) -> Result<Vec<StoredLog>, LogServiceError> {
        let (tenant, filter) = query.resolve()?;
        self.run(tenant, &filter)
    }

    /// `GET /{app_name}/allusers`: tenant plus optional user. No date filter.
    pub fn list_all_users(
        &self,
        app_name: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<StoredLog>, LogServiceError> {
        let tenant = Tenant::resolve(app_name)?;
        let filter = match user_id.filter(|id| !id.is_empty()) {
            Some(user_id) => LogFilter::all().with_user_id(user_id),
            None => LogFilter::all(),
        };
        self.run(tenant, &filter)
    }

    fn run(&self, tenant: Tenant, filter: &LogFilter) -> Result<Vec<StoredLog>, LogServiceError> {
        let start = Instant::now();
        let mut logs = self.stores.for_tenant(tenant).find(filter).map_err(|err| {
            error!(tenant = %tenant, error = %err, "log_query_failed");
            err
        })?;
        sort_logs(&mut logs);

        info!(
            tenant = %tenant,
            user_filter = filter.user_id.is_some(),
            time_filter = filter.timestamp.is_some(),
            results = logs.len(),
            elapsed_micros = start.elapsed().as_micros(),
            "log_query"
        );
        Ok(logs)
    }
}

fn sort_logs(logs: &mut [StoredLog]) {
    logs.sort_by(|a, b| {
        a.record
            .timestamp
            .cmp(&b.record.timestamp)
            .then_with(|| a.record_id.cmp(&b.record_id))
    });
}
