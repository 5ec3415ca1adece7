use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use applog::{
    FixedClock, IngestError, IngestionService, LogBackend, LogFilter, LogQuery, LogRecord,
    LogServiceError, QueryService, RecordId, StoreError, StoredLog, TenantStores,
};
use chrono::Utc;
use serde_json::{Value, json};

/// Backend that counts every call and can be told to fail.
#[derive(Default)]
struct CountingBackend {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl LogBackend for CountingBackend {
    fn insert(&self, _record: &LogRecord) -> Result<RecordId, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StoreError::backend("write refused"));
        }
        Ok(RecordId::generate())
    }

    fn find(&self, _filter: &LogFilter) -> Result<Vec<StoredLog>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StoreError::backend("read refused"));
        }
        Ok(Vec::new())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(0)
    }
}

fn counting_stores(fail: bool) -> (Arc<TenantStores>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let stores = TenantStores::from_fn("counting", |_| {
        Ok(Box::new(CountingBackend {
            calls: Arc::clone(&calls),
            fail,
        }) as Box<dyn LogBackend>)
    })
    .unwrap();
    (Arc::new(stores), calls)
}

fn services(fail: bool) -> (IngestionService, QueryService, Arc<AtomicUsize>) {
    let (stores, calls) = counting_stores(fail);
    let clock = Arc::new(FixedClock::new(Utc::now()));
    (
        IngestionService::new(Arc::clone(&stores), clock),
        QueryService::new(stores),
        calls,
    )
}

fn valid_body() -> Value {
    json!({
        "app_name": "zig",
        "api_type": "search",
        "api_response": {"ok": true},
        "mobile_type": "ios",
        "input": "",
        "user_id": "u-1",
        "user_name": "",
        "current_location": null
    })
}

#[test]
fn non_json_body_is_invalid_input_without_store_access() {
    let (ingestion, _, calls) = services(false);
    assert_eq!(
        ingestion.ingest(b"app_name=zig"),
        Err(LogServiceError::Ingest(IngestError::InvalidInput))
    );
    assert_eq!(
        ingestion.ingest(b"[1, 2, 3]"),
        Err(LogServiceError::Ingest(IngestError::InvalidInput))
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn first_missing_key_in_declared_order_is_reported() {
    let (ingestion, _, calls) = services(false);
    let mut body = valid_body();
    let fields = body.as_object_mut().unwrap();
    fields.remove("current_location");
    fields.remove("mobile_type");
    fields.remove("user_id");

    assert_eq!(
        ingestion.ingest_value(body),
        Err(LogServiceError::Ingest(IngestError::MissingField(
            "mobile_type".into()
        )))
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn null_and_empty_values_satisfy_presence() {
    let (ingestion, _, calls) = services(false);
    assert!(ingestion.ingest_value(valid_body()).is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn unknown_app_name_touches_no_store_on_any_path() {
    let (ingestion, queries, calls) = services(false);

    let mut body = valid_body();
    body["app_name"] = json!("notarealapp");
    let expected = LogServiceError::Ingest(IngestError::InvalidTenant("notarealapp".into()));

    assert_eq!(ingestion.ingest_value(body), Err(expected.clone()));
    assert_eq!(
        queries.list_logs(&LogQuery::for_app("notarealapp")),
        Err(expected.clone())
    );
    assert_eq!(queries.list_all_users("notarealapp", Some("u-1")), Err(expected));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn non_string_app_name_is_an_unknown_tenant() {
    let (ingestion, _, calls) = services(false);
    let mut body = valid_body();
    body["app_name"] = json!(7);
    assert_eq!(
        ingestion.ingest_value(body),
        Err(LogServiceError::Ingest(IngestError::InvalidTenant("7".into())))
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn malformed_api_response_rejects_whole_record() {
    let (ingestion, _, calls) = services(false);
    let mut body = valid_body();
    body["api_response"] = json!("Optional(status: ok)");
    assert!(matches!(
        ingestion.ingest_value(body),
        Err(LogServiceError::Ingest(IngestError::MalformedResponse(_)))
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn bad_date_is_reported_without_store_access() {
    let (_, queries, calls) = services(false);
    assert_eq!(
        queries.list_logs(&LogQuery::for_app("zig").with_to("2024/01/31")),
        Err(LogServiceError::InvalidDateFormat {
            field: "to",
            value: "2024/01/31".into()
        })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn store_failures_surface_as_storage_errors() {
    let (ingestion, queries, calls) = services(true);

    let err = ingestion.ingest_value(valid_body()).unwrap_err();
    assert_eq!(
        err,
        LogServiceError::Storage(StoreError::Backend("write refused".into()))
    );
    assert!(!err.is_client_error());

    let err = queries.list_logs(&LogQuery::for_app("zig")).unwrap_err();
    assert!(matches!(err, LogServiceError::Storage(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
