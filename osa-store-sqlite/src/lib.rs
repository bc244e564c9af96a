//! SQLite storage host for settings records.
//!
//! One row per record key, the record stored as a JSON object. Page-level
//! and item-scoped records share the table; item rows carry their entity.

use osa_engine::{StorageError, StorageHost, StorageResult};
use osa_model::{Record, RecordKey};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Persistent [`StorageHost`] backed by SQLite.
#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Opens (or creates) a settings database at the given path.
    pub fn new(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|e| StorageError::Backend(format!("failed to open settings store: {e}")))?;
        let store = Self::with_connection(conn)?;
        info!("Opened settings store at {:?}", path);
        Ok(store)
    }

    /// Opens an in-memory settings database (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StorageError::Backend(format!("failed to open in-memory settings store: {e}"))
        })?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS settings_records (
                record_key TEXT PRIMARY KEY,
                section_id TEXT NOT NULL,
                entity TEXT,
                data TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_settings_records_section
                ON settings_records (section_id);
            ",
        )
        .map_err(|e| StorageError::Backend(format!("failed to init settings schema: {e}")))?;
        Ok(())
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    /// Number of stored records.
    pub fn count(&self) -> StorageResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM settings_records", [], |row| row.get(0))
            .map_err(|e| StorageError::Backend(format!("failed to count records: {e}")))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Entities that hold an item-scoped record for `section_id`, sorted.
    pub fn entities(&self, section_id: &str) -> StorageResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT entity FROM settings_records
                 WHERE section_id = ?1 AND entity IS NOT NULL
                 ORDER BY entity",
            )
            .map_err(|e| StorageError::Backend(format!("failed to prepare entity query: {e}")))?;
        let rows = stmt
            .query_map(params![section_id], |row| row.get::<_, String>(0))
            .map_err(|e| StorageError::Backend(format!("failed to list entities: {e}")))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::Backend(format!("failed to read entity row: {e}")))
    }
}

impl StorageHost for SqliteStorage {
    fn get(&self, key: &RecordKey) -> StorageResult<Option<Record>> {
        let storage_key = key.storage_key();
        let conn = self.lock()?;
        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM settings_records WHERE record_key = ?1",
                params![storage_key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StorageError::Backend(format!("failed to load record: {e}")))?;

        let Some(data) = data else {
            return Ok(None);
        };
        let record = serde_json::from_str(&data).map_err(|e| StorageError::Corrupt {
            key: storage_key,
            reason: e.to_string(),
        })?;
        Ok(Some(record))
    }

    fn set(&self, key: &RecordKey, record: &Record) -> StorageResult<()> {
        let data = serde_json::to_string(record)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO settings_records (record_key, section_id, entity, data)
             VALUES (?1, ?2, ?3, ?4)",
            params![key.storage_key(), key.section_id(), key.entity(), data],
        )
        .map_err(|e| StorageError::Backend(format!("failed to save record: {e}")))?;
        debug!(record = %key, fields = record.len(), "Record written");
        Ok(())
    }

    fn delete(&self, key: &RecordKey) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM settings_records WHERE record_key = ?1",
            params![key.storage_key()],
        )
        .map_err(|e| StorageError::Backend(format!("failed to delete record: {e}")))?;
        debug!(record = %key, "Record deleted");
        Ok(())
    }
}
