//! Storage host boundary.
//!
//! The engine reads the previous record before a submission and writes the
//! reconciled record afterward. Implementations serialize individual calls;
//! nothing guards the read-modify-write as a whole, so two concurrent saves
//! of the same record are last-write-wins.

use osa_model::{Record, RecordKey};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Result type for storage host operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors reported by a storage host.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend failure (database, filesystem, ...).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored record could not be decoded.
    #[error("corrupt record '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Persists one flat key→value record per record key.
pub trait StorageHost {
    /// Returns the stored record, or `None` if nothing was saved yet.
    fn get(&self, key: &RecordKey) -> StorageResult<Option<Record>>;

    /// Replaces the stored record.
    fn set(&self, key: &RecordKey, record: &Record) -> StorageResult<()>;

    /// Removes the stored record; removing a missing record is not an error.
    fn delete(&self, key: &RecordKey) -> StorageResult<()>;
}

impl<T: StorageHost + ?Sized> StorageHost for &T {
    fn get(&self, key: &RecordKey) -> StorageResult<Option<Record>> {
        (**self).get(key)
    }

    fn set(&self, key: &RecordKey, record: &Record) -> StorageResult<()> {
        (**self).set(key, record)
    }

    fn delete(&self, key: &RecordKey) -> StorageResult<()> {
        (**self).delete(key)
    }
}

impl<T: StorageHost + ?Sized> StorageHost for Arc<T> {
    fn get(&self, key: &RecordKey) -> StorageResult<Option<Record>> {
        (**self).get(key)
    }

    fn set(&self, key: &RecordKey, record: &Record) -> StorageResult<()> {
        (**self).set(key, record)
    }

    fn delete(&self, key: &RecordKey) -> StorageResult<()> {
        (**self).delete(key)
    }
}

/// In-process storage host, keyed by [`RecordKey`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<RecordKey, Record>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn count(&self) -> StorageResult<usize> {
        let records = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(records.len())
    }
}

impl StorageHost for MemoryStorage {
    fn get(&self, key: &RecordKey) -> StorageResult<Option<Record>> {
        let records = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(records.get(key).cloned())
    }

    fn set(&self, key: &RecordKey, record: &Record) -> StorageResult<()> {
        let mut records = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        records.insert(key.clone(), record.clone());
        Ok(())
    }

    fn delete(&self, key: &RecordKey) -> StorageResult<()> {
        let mut records = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        records.remove(key);
        Ok(())
    }
}
