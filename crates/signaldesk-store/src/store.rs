use async_trait::async_trait;

use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::sqlite::SqliteStore;

/// Flat map from string keys to JSON blobs. Mockable for testing.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the blob stored under `key`.
    async fn put(&self, key: &str, value_json: String) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read-through, write-through store: checks moka (hot) → SQLite (durable).
///
/// SQLite hits are promoted to the hot layer. Writes go to SQLite first and
/// only then refresh the hot copy, so a failed write never leaves the hot
/// layer ahead of disk.
pub struct CachedStore {
    memory: MemoryStore,
    sqlite: SqliteStore,
}

impl CachedStore {
    pub fn new(sqlite: SqliteStore, max_capacity: u64) -> Self {
        Self {
            memory: MemoryStore::new(max_capacity),
            sqlite,
        }
    }

    /// Get the number of entries in the hot layer.
    pub fn hot_cache_size(&self) -> u64 {
        self.memory.entry_count()
    }
}

#[async_trait]
impl KeyValueStore for CachedStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(json) = self.memory.get(key).await {
            return Ok(Some(json));
        }

        if let Some(row) = self.sqlite.get_row(key)? {
            self.memory
                .insert(key.to_string(), row.value_json.clone())
                .await;
            return Ok(Some(row.value_json));
        }

        Ok(None)
    }

    async fn put(&self, key: &str, value_json: String) -> Result<(), StoreError> {
        self.sqlite.put_row(key, &value_json)?;
        self.memory.insert(key.to_string(), value_json).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.sqlite.delete_row(key)?;
        self.memory.invalidate(key).await;
        Ok(())
    }
}
