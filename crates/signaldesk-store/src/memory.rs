use async_trait::async_trait;
use moka::future::Cache;

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// In-memory key-value store backed by moka.
///
/// Entries never expire; the capacity bound only matters for the hot layer
/// in `CachedStore`. Used directly as an ephemeral store and in tests.
pub struct MemoryStore {
    inner: Cache<String, String>,
}

impl MemoryStore {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(max_capacity).build(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).await
    }

    pub async fn insert(&self, key: String, value: String) {
        self.inner.insert(key, value).await;
    }

    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(1_000)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(MemoryStore::get(self, key).await)
    }

    async fn put(&self, key: &str, value_json: String) -> Result<(), StoreError> {
        self.insert(key.to_string(), value_json).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.invalidate(key).await;
        Ok(())
    }
}
