//! Single-record aggregate repository backed by redb.
//!
//! Exactly one aggregate record exists per data directory. Every operation
//! addresses one fixed key, so the single-record constraint is an invariant
//! of the repository rather than an accident of check-then-create logic.
//! All writes go through transactions; reads use MVCC snapshots.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};

use crate::error::StoreError;
use crate::reconcile::merge;
use crate::record::FieldMapping;

/// Table holding the aggregate record (one fixed key → serialized mapping).
const AGGREGATE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("aggregate");

/// The well-known key under which the sole record is stored.
const RECORD_KEY: &str = "record";

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The single-record aggregate store.
pub struct AggregateStore {
    db: Arc<Database>,
}

impl AggregateStore {
    /// Open or create the store in the given data directory.
    ///
    /// Failure here is a startup condition; callers should treat it as fatal.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(data_dir).map_err(|e| StoreError::Io { source: e })?;
        let db_path = data_dir.join("dossier.redb");
        let db = Database::create(&db_path).map_err(|e| StoreError::Redb {
            message: format!("failed to open redb at {}: {e}", db_path.display()),
        })?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Read the current aggregate record, or `None` if none exists yet.
    pub fn read(&self) -> StoreResult<Option<FieldMapping>> {
        let txn = self.db.begin_read().map_err(|e| StoreError::Redb {
            message: format!("begin_read failed: {e}"),
        })?;
        let table = match txn.open_table(AGGREGATE_TABLE) {
            Ok(t) => t,
            // First read before any write: the table does not exist yet.
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => {
                return Err(StoreError::Redb {
                    message: format!("open_table failed: {e}"),
                });
            }
        };
        let bytes = table.get(RECORD_KEY).map_err(|e| StoreError::Redb {
            message: format!("get failed: {e}"),
        })?;
        match bytes {
            Some(guard) => {
                let mapping = serde_json::from_slice(guard.value()).map_err(|e| {
                    StoreError::Serialization {
                        message: format!("stored record is not a valid field mapping: {e}"),
                    }
                })?;
                Ok(Some(mapping))
            }
            None => Ok(None),
        }
    }

    /// Whether a record currently exists.
    pub fn exists(&self) -> StoreResult<bool> {
        self.read().map(|r| r.is_some())
    }

    /// Create the record. Only meaningful when no record exists; if one does,
    /// this is equivalent to [`replace`](Self::replace).
    pub fn write(&self, mapping: &FieldMapping) -> StoreResult<()> {
        self.put(mapping)
    }

    /// Overwrite the sole record with a fully reconciled mapping.
    pub fn replace(&self, mapping: &FieldMapping) -> StoreResult<()> {
        self.put(mapping)
    }

    /// Merge `incoming` into the stored record and persist the result.
    ///
    /// When no record exists (including a record that went missing between
    /// runs), the incoming mapping becomes the first record. Returns the
    /// reconciled mapping as persisted.
    pub fn absorb(&self, incoming: &FieldMapping) -> StoreResult<FieldMapping> {
        let merged = match self.read()? {
            Some(existing) => merge(&existing, incoming),
            None => incoming.clone(),
        };
        self.replace(&merged)?;
        Ok(merged)
    }

    /// Delete the record. Supports the full-reset operation; idempotent.
    pub fn clear(&self) -> StoreResult<bool> {
        let txn = self.db.begin_write().map_err(|e| StoreError::Redb {
            message: format!("begin_write failed: {e}"),
        })?;
        let existed = {
            let mut table = txn
                .open_table(AGGREGATE_TABLE)
                .map_err(|e| StoreError::Redb {
                    message: format!("open_table failed: {e}"),
                })?;
            table
                .remove(RECORD_KEY)
                .map_err(|e| StoreError::Redb {
                    message: format!("remove failed: {e}"),
                })?
                .is_some()
        };
        txn.commit().map_err(|e| StoreError::Redb {
            message: format!("commit failed: {e}"),
        })?;
        Ok(existed)
    }

    fn put(&self, mapping: &FieldMapping) -> StoreResult<()> {
        let bytes = serde_json::to_vec(mapping).map_err(|e| StoreError::Serialization {
            message: format!("failed to serialize field mapping: {e}"),
        })?;
        let txn = self.db.begin_write().map_err(|e| StoreError::Redb {
            message: format!("begin_write failed: {e}"),
        })?;
        {
            let mut table = txn
                .open_table(AGGREGATE_TABLE)
                .map_err(|e| StoreError::Redb {
                    message: format!("open_table failed: {e}"),
                })?;
            table
                .insert(RECORD_KEY, bytes.as_slice())
                .map_err(|e| StoreError::Redb {
                    message: format!("insert failed: {e}"),
                })?;
        }
        txn.commit().map_err(|e| StoreError::Redb {
            message: format!("commit failed: {e}"),
        })?;
        Ok(())
    }
}

impl std::fmt::Debug for AggregateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregateStore").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use tempfile::TempDir;

    fn mapping(json: &str) -> FieldMapping {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn read_before_any_write_returns_none() {
        let dir = TempDir::new().unwrap();
        let store = AggregateStore::open(dir.path()).unwrap();
        assert_eq!(store.read().unwrap(), None);
        assert!(!store.exists().unwrap());
    }

    #[test]
    fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let store = AggregateStore::open(dir.path()).unwrap();

        let m = mapping(r#"{"name": "Jane", "email": "N/A"}"#);
        store.write(&m).unwrap();
        assert_eq!(store.read().unwrap(), Some(m));
    }

    #[test]
    fn replace_overwrites_fully() {
        let dir = TempDir::new().unwrap();
        let store = AggregateStore::open(dir.path()).unwrap();

        store.write(&mapping(r#"{"a": "1", "b": "2"}"#)).unwrap();
        let replacement = mapping(r#"{"c": "3"}"#);
        store.replace(&replacement).unwrap();
        assert_eq!(store.read().unwrap(), Some(replacement));
    }

    #[test]
    fn absorb_creates_on_missing_record() {
        let dir = TempDir::new().unwrap();
        let store = AggregateStore::open(dir.path()).unwrap();

        let incoming = mapping(r#"{"name": "Jane"}"#);
        let merged = store.absorb(&incoming).unwrap();
        assert_eq!(merged, incoming);
        assert_eq!(store.read().unwrap(), Some(incoming));
    }

    #[test]
    fn absorb_applies_merge_precedence() {
        let dir = TempDir::new().unwrap();
        let store = AggregateStore::open(dir.path()).unwrap();

        store
            .absorb(&mapping(r#"{"name": "N/A", "dob": "1990-01-01"}"#))
            .unwrap();
        let merged = store
            .absorb(&mapping(r#"{"name": "Jane Doe", "dob": "2000-01-01"}"#))
            .unwrap();

        assert_eq!(merged.get("name"), Some(&FieldValue::Present("Jane Doe".into())));
        assert_eq!(
            merged.get("dob"),
            Some(&FieldValue::Present("1990-01-01".into()))
        );
    }

    #[test]
    fn clear_deletes_the_record() {
        let dir = TempDir::new().unwrap();
        let store = AggregateStore::open(dir.path()).unwrap();

        store.write(&mapping(r#"{"a": "1"}"#)).unwrap();
        assert!(store.clear().unwrap());
        assert_eq!(store.read().unwrap(), None);
        // Idempotent.
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn persistence_across_reopens() {
        let dir = TempDir::new().unwrap();
        let m = mapping(r#"{"name": "Jane"}"#);

        {
            let store = AggregateStore::open(dir.path()).unwrap();
            store.write(&m).unwrap();
        }

        let store = AggregateStore::open(dir.path()).unwrap();
        assert_eq!(store.read().unwrap(), Some(m));
    }
}
