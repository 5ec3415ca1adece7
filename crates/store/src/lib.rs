//! # applog store
//!
//! Per-tenant storage for client log records. Every [`Tenant`] owns its own
//! [`LogBackend`]; there are no cross-tenant queries.
//!
//! ## Core Features
//!
//! - **Pluggable Backends**: one trait, two implementations:
//!   - an in-memory `HashMap` backend for tests and throwaway deployments,
//!   - a redb backend (one table per tenant in a single file), enabled by the
//!     default `backend-redb` feature.
//! - **Store-assigned identifiers**: `insert` returns an opaque [`RecordId`]
//!   that is rendered as a string and never interpreted.
//! - **Filtering**: [`LogFilter`] carries an optional `user_id` equality and
//!   an optional half-open [`TimeRange`] on `timestamp`.
//!
//! ## Example Usage
//!
//! ```
//! use chrono::Utc;
//! use ingest::{normalize_record, Tenant};
//! use serde_json::json;
//! use store::{BackendConfig, LogFilter};
//!
//! let stores = BackendConfig::in_memory().build().unwrap();
//! let record = normalize_record(
//!     json!({
//!         "app_name": "goaccess",
//!         "api_type": "login",
//!         "api_response": {"ok": true},
//!         "mobile_type": "ios",
//!         "input": "",
//!         "user_id": "u-1",
//!         "user_name": "Ada",
//!         "current_location": null
//!     }),
//!     Utc::now(),
//! )
//! .unwrap();
//!
//! let store = stores.for_tenant(Tenant::Goaccess);
//! let record_id = store.insert(&record).unwrap();
//! let found = store.find(&LogFilter::all().with_user_id("u-1")).unwrap();
//! assert_eq!(found[0].record_id, record_id);
//! assert!(stores.for_tenant(Tenant::Zig).find(&LogFilter::all()).unwrap().is_empty());
//! ```

mod backend;
mod query;

pub use backend::{BackendConfig, InMemoryBackend, LogBackend};
#[cfg(feature = "backend-redb")]
pub use backend::RedbBackend;
pub use query::{LogFilter, TimeRange};

use ingest::{LogRecord, Tenant};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Identifier assigned by a store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record as read back from a store, paired with its identifier.
///
/// Serializes flat: `{"record_id": "...", "app_name": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLog {
    pub record_id: RecordId,
    #[serde(flatten)]
    pub record: LogRecord,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Serialization encode error: {0}")]
    Encode(String),
    #[error("Serialization decode error: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn backend<E: fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }
}

/// One store handle per tenant.
///
/// The tenant set is closed, so the mapping is an exhaustive `match` rather
/// than a lookup that could miss.
pub struct TenantStores {
    zig: Box<dyn LogBackend>,
    mdot: Box<dyn LogBackend>,
    ecolane: Box<dyn LogBackend>,
    goaccess: Box<dyn LogBackend>,
    kind: &'static str,
}

impl TenantStores {
    /// Build the set by calling `open` once per tenant.
    pub fn from_fn<F>(kind: &'static str, mut open: F) -> Result<Self, StoreError>
    where
        F: FnMut(Tenant) -> Result<Box<dyn LogBackend>, StoreError>,
    {
        Ok(Self {
            zig: open(Tenant::Zig)?,
            mdot: open(Tenant::Mdot)?,
            ecolane: open(Tenant::Ecolane)?,
            goaccess: open(Tenant::Goaccess)?,
            kind,
        })
    }

    pub fn in_memory() -> Self {
        Self {
            zig: Box::new(InMemoryBackend::new()),
            mdot: Box::new(InMemoryBackend::new()),
            ecolane: Box::new(InMemoryBackend::new()),
            goaccess: Box::new(InMemoryBackend::new()),
            kind: "memory",
        }
    }

    pub fn for_tenant(&self, tenant: Tenant) -> &dyn LogBackend {
        match tenant {
            Tenant::Zig => self.zig.as_ref(),
            Tenant::Mdot => self.mdot.as_ref(),
            Tenant::Ecolane => self.ecolane.as_ref(),
            Tenant::Goaccess => self.goaccess.as_ref(),
        }
    }

    /// Backend name, for readiness reporting.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl fmt::Debug for TenantStores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantStores").field("kind", &self.kind).finish()
    }
}
