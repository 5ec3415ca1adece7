use crate::{LogFilter, RecordId, StoreError, StoredLog, TenantStores};
use ingest::LogRecord;
use std::collections::HashMap;
use std::sync::RwLock;

/// One tenant's log store.
///
/// Records are append-only: there is no update or delete. Each `insert` is
/// atomic on its own, so a failed insert leaves the store unchanged.
pub trait LogBackend: Send + Sync {
    /// Persist a record and return the identifier the store assigned to it.
    fn insert(&self, record: &LogRecord) -> Result<RecordId, StoreError>;
    /// Return every record matching `filter`, in store-natural order.
    fn find(&self, filter: &LogFilter) -> Result<Vec<StoredLog>, StoreError>;
    /// Number of records held.
    fn count(&self) -> Result<usize, StoreError>;
}

/// Configuration for selecting and building the per-tenant stores.
///
/// # Example
/// ```
/// use store::BackendConfig;
///
/// // In-memory (for testing)
/// let config = BackendConfig::in_memory();
///
/// // Redb (pure Rust, persistent)
/// let config = BackendConfig::redb("/data/applog.redb");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BackendConfig {
    /// One redb file holding a table per tenant.
    ///
    /// Requires the `backend-redb` feature (enabled by default).
    Redb { path: String },
    /// A `HashMap` per tenant. Contents are lost at shutdown.
    #[default]
    InMemory,
}

impl BackendConfig {
    pub fn in_memory() -> Self {
        BackendConfig::InMemory
    }

    pub fn redb<P: Into<String>>(path: P) -> Self {
        BackendConfig::Redb { path: path.into() }
    }

    /// Short name reported by readiness probes.
    pub fn kind(&self) -> &'static str {
        match self {
            BackendConfig::InMemory => "memory",
            BackendConfig::Redb { .. } => "redb",
        }
    }

    /// Open one store per tenant.
    pub fn build(&self) -> Result<TenantStores, StoreError> {
        match self {
            BackendConfig::InMemory => Ok(TenantStores::in_memory()),
            BackendConfig::Redb { path } => {
                #[cfg(feature = "backend-redb")]
                {
                    RedbBackend::open_stores(path)
                }
                #[cfg(not(feature = "backend-redb"))]
                {
                    let _ = path;
                    Err(StoreError::backend("redb backend disabled at compile time"))
                }
            }
        }
    }
}

/// An in-memory backend using a `RwLock` around a `HashMap`.
pub struct InMemoryBackend {
    records: RwLock<HashMap<RecordId, LogRecord>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LogBackend for InMemoryBackend {
    fn insert(&self, record: &LogRecord) -> Result<RecordId, StoreError> {
        let record_id = RecordId::generate();
        self.records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?
            .insert(record_id.clone(), record.clone());
        Ok(record_id)
    }

    fn find(&self, filter: &LogFilter) -> Result<Vec<StoredLog>, StoreError> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard
            .iter()
            .filter(|(_, record)| filter.matches(record))
            .map(|(record_id, record)| StoredLog {
                record_id: record_id.clone(),
                record: record.clone(),
            })
            .collect())
    }

    fn count(&self) -> Result<usize, StoreError> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard.len())
    }
}

#[cfg(feature = "backend-redb")]
pub mod redb;

#[cfg(feature = "backend-redb")]
pub use self::redb::RedbBackend;
