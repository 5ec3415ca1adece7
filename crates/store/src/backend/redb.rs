//! Redb (Rust embedded database) backend for tenant log storage.
//!
//! A single database file holds one table per tenant (`zig_logs`,
//! `mdot_logs`, ...). Keys are record ids, values are the JSON-encoded
//! [`LogRecord`]. Every insert is its own write transaction, so a record is
//! either fully committed or absent.
//!
//! # Configuration Example
//! ```toml
//! # server.toml
//! database_path = "/data/applog.redb"
//! ```

use crate::{LogBackend, LogFilter, RecordId, StoreError, StoredLog, TenantStores};
use ::redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use ingest::{LogRecord, Tenant};
use std::path::Path;
use std::sync::Arc;

type LogTable = TableDefinition<'static, &'static str, &'static [u8]>;

fn table_for(tenant: Tenant) -> LogTable {
    let name = match tenant {
        Tenant::Zig => "zig_logs",
        Tenant::Mdot => "mdot_logs",
        Tenant::Ecolane => "ecolane_logs",
        Tenant::Goaccess => "goaccess_logs",
    };
    TableDefinition::new(name)
}

/// One tenant's table inside a shared redb database.
///
/// # Thread Safety
/// The `Arc<Database>` is shared by all four tenant handles. Redb serializes
/// write transactions internally and gives readers MVCC snapshots.
pub struct RedbBackend {
    db: Arc<Database>,
    table: LogTable,
}

impl RedbBackend {
    /// Open or create the database at `path` and return a handle per tenant.
    ///
    /// All tenant tables are created up front so reads never hit a missing
    /// table.
    pub fn open_stores<P: AsRef<Path>>(path: P) -> Result<TenantStores, StoreError> {
        let path = path.as_ref();
        let db = Database::create(path).map_err(StoreError::backend)?;

        let write_txn = db.begin_write().map_err(StoreError::backend)?;
        for tenant in Tenant::ALL {
            write_txn
                .open_table(table_for(tenant))
                .map_err(StoreError::backend)?;
        }
        write_txn.commit().map_err(StoreError::backend)?;
        tracing::info!(path = %path.display(), tenants = Tenant::ALL.len(), "opened redb log stores");

        let db = Arc::new(db);
        TenantStores::from_fn("redb", |tenant| {
            Ok(Box::new(RedbBackend {
                db: Arc::clone(&db),
                table: table_for(tenant),
            }) as Box<dyn LogBackend>)
        })
    }
}

impl LogBackend for RedbBackend {
    fn insert(&self, record: &LogRecord) -> Result<RecordId, StoreError> {
        let record_id = RecordId::generate();
        let bytes = serde_json::to_vec(record).map_err(|e| StoreError::Encode(e.to_string()))?;

        let write_txn = self.db.begin_write().map_err(StoreError::backend)?;
        {
            let mut table = write_txn
                .open_table(self.table)
                .map_err(StoreError::backend)?;
            table
                .insert(record_id.as_str(), bytes.as_slice())
                .map_err(StoreError::backend)?;
        }
        write_txn.commit().map_err(StoreError::backend)?;

        Ok(record_id)
    }

    fn find(&self, filter: &LogFilter) -> Result<Vec<StoredLog>, StoreError> {
        let read_txn = self.db.begin_read().map_err(StoreError::backend)?;
        let table = read_txn
            .open_table(self.table)
            .map_err(StoreError::backend)?;

        let mut found = Vec::new();
        for item in table.iter().map_err(StoreError::backend)? {
            let (key, value) = item.map_err(StoreError::backend)?;
            let record: LogRecord = serde_json::from_slice(value.value())
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            if filter.matches(&record) {
                found.push(StoredLog {
                    record_id: RecordId::from(key.value().to_string()),
                    record,
                });
            }
        }
        Ok(found)
    }

    fn count(&self) -> Result<usize, StoreError> {
        let read_txn = self.db.begin_read().map_err(StoreError::backend)?;
        let table = read_txn
            .open_table(self.table)
            .map_err(StoreError::backend)?;

        let mut count = 0;
        for item in table.iter().map_err(StoreError::backend)? {
            item.map_err(StoreError::backend)?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record_at;
    use crate::TimeRange;
    use chrono::DateTime;
    use tempfile::NamedTempFile;

    #[test]
    fn test_redb_insert_and_find_roundtrip() {
        let temp_file = NamedTempFile::new().unwrap();
        let stores = RedbBackend::open_stores(temp_file.path()).unwrap();
        assert_eq!(stores.kind(), "redb");

        let store = stores.for_tenant(Tenant::Zig);
        let record = record_at("u-1", 42);
        let record_id = store.insert(&record).unwrap();

        let found = store.find(&LogFilter::all()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record_id, record_id);
        assert_eq!(found[0].record, record);
    }

    #[test]
    fn test_redb_tables_are_per_tenant() {
        let temp_file = NamedTempFile::new().unwrap();
        let stores = RedbBackend::open_stores(temp_file.path()).unwrap();

        stores.for_tenant(Tenant::Ecolane).insert(&record_at("u-1", 1)).unwrap();
        stores.for_tenant(Tenant::Ecolane).insert(&record_at("u-2", 2)).unwrap();

        assert_eq!(stores.for_tenant(Tenant::Ecolane).count().unwrap(), 2);
        assert_eq!(stores.for_tenant(Tenant::Mdot).count().unwrap(), 0);
        assert!(stores
            .for_tenant(Tenant::Goaccess)
            .find(&LogFilter::all())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_redb_find_applies_filter() {
        let temp_file = NamedTempFile::new().unwrap();
        let stores = RedbBackend::open_stores(temp_file.path()).unwrap();
        let store = stores.for_tenant(Tenant::Mdot);

        store.insert(&record_at("u-1", 100)).unwrap();
        store.insert(&record_at("u-1", 300)).unwrap();
        store.insert(&record_at("u-2", 150)).unwrap();

        let range = TimeRange::new(
            DateTime::from_timestamp(100, 0).unwrap(),
            DateTime::from_timestamp(200, 0).unwrap(),
        );
        let found = store
            .find(&LogFilter::all().with_user_id("u-1").with_time_range(range))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record.timestamp.timestamp(), 100);
    }

    #[test]
    fn test_redb_reopen_keeps_records() {
        let temp_file = NamedTempFile::new().unwrap();
        let record_id = {
            let stores = RedbBackend::open_stores(temp_file.path()).unwrap();
            stores.for_tenant(Tenant::Zig).insert(&record_at("u-1", 7)).unwrap()
        };

        let stores = RedbBackend::open_stores(temp_file.path()).unwrap();
        let found = stores.for_tenant(Tenant::Zig).find(&LogFilter::all()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record_id, record_id);
    }
}
