use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::Connection;
use signaldesk_models::store_schema::{KvRow, KV_TABLE_DDL};

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// SQLite-backed key-value store.
///
/// Each key holds one JSON blob that is replaced wholesale on every write.
/// Access is synchronized via `Mutex` since `rusqlite::Connection` is not `Sync`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store file. Creates the schema and enables WAL.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(KV_TABLE_DDL)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database. Useful for testing.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(KV_TABLE_DDL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("SQLite mutex poisoned: {e}")))
    }

    /// Get a single row by key.
    pub fn get_row(&self, key: &str) -> Result<Option<KvRow>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(
            "SELECT key, value_json, updated_at FROM kv_entries WHERE key = ?1",
        )?;

        let result = stmt.query_row(rusqlite::params![key], |row| {
            Ok(KvRow {
                key: row.get(0)?,
                value_json: row.get(1)?,
                updated_at: row.get(2)?,
            })
        });

        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    /// Insert or replace the blob for `key`.
    pub fn put_row(&self, key: &str, value_json: &str) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO kv_entries (key, value_json, updated_at) \
             VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value_json, now],
        )?;
        Ok(())
    }

    /// Delete `key`. Returns whether a row was removed.
    pub fn delete_row(&self, key: &str) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM kv_entries WHERE key = ?1",
            rusqlite::params![key],
        )?;
        Ok(deleted > 0)
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get_row(key)?.map(|row| row.value_json))
    }

    async fn put(&self, key: &str, value_json: String) -> Result<(), StoreError> {
        self.put_row(key, &value_json)
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.delete_row(key)?;
        Ok(())
    }
}
