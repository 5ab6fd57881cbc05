use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use signaldesk_models::store_schema::{HISTORY_KEY, WATCHLIST_KEY};
use signaldesk_models::{HistoryLog, Watchlist};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Typed access to one persisted value. Injected into pages so tests can
/// substitute an in-memory fake.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// The stored value, or the repository default when nothing is stored.
    async fn load(&self) -> Result<T, StoreError>;

    /// Replace the stored value with `value`, serialized as one blob.
    async fn save(&self, value: &T) -> Result<(), StoreError>;
}

/// What `load` does with a stored blob that does not deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unreadable {
    /// Log and fall back to the default.
    UseDefault,
    /// Return `StoreError::Json` and leave the blob alone.
    Fail,
}

/// Stores `T` as a JSON blob under a single key.
pub struct JsonRepository<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    default: fn() -> T,
    unreadable: Unreadable,
}

impl<T> JsonRepository<T> {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, default: fn() -> T) -> Self {
        Self {
            store,
            key: key.into(),
            default,
            unreadable: Unreadable::UseDefault,
        }
    }

    pub fn on_unreadable(mut self, unreadable: Unreadable) -> Self {
        self.unreadable = unreadable;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl<T> Repository<T> for JsonRepository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self) -> Result<T, StoreError> {
        let Some(json) = self.store.get(&self.key).await? else {
            debug!(key = %self.key, "No stored value, using default");
            return Ok((self.default)());
        };

        match serde_json::from_str(&json) {
            Ok(value) => Ok(value),
            Err(e) if self.unreadable == Unreadable::UseDefault => {
                warn!(key = %self.key, error = %e, "Stored value is unreadable, using default");
                Ok((self.default)())
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored value is unreadable");
                Err(StoreError::Json(e))
            }
        }
    }

    async fn save(&self, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.store.put(&self.key, json).await
    }
}

/// Analysis history under `signalHistory`. Defaults to an empty log. An
/// unreadable log is an error so it is never overwritten by a fresh one.
pub fn history_repository(store: Arc<dyn KeyValueStore>) -> JsonRepository<HistoryLog> {
    JsonRepository::new(store, HISTORY_KEY, HistoryLog::default).on_unreadable(Unreadable::Fail)
}

/// Watchlist under `signalWatchlist`. Defaults to the seed symbols.
pub fn watchlist_repository(store: Arc<dyn KeyValueStore>) -> JsonRepository<Watchlist> {
    JsonRepository::new(store, WATCHLIST_KEY, Watchlist::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use signaldesk_models::{HistoryItem, InsertPosition, MarketSentiment, Signal};

    fn memory_store() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::default())
    }

    #[tokio::test]
    async fn watchlist_defaults_when_absent() {
        let repo = watchlist_repository(memory_store());
        let watchlist = repo.load().await.unwrap();
        assert_eq!(watchlist.symbols(), &["XAUUSD", "BTCUSD", "EURUSD", "DJI"]);
    }

    #[tokio::test]
    async fn watchlist_defaults_when_unparseable() {
        let store = memory_store();
        store
            .put(WATCHLIST_KEY, "not json at all".to_string())
            .await
            .unwrap();

        let repo = watchlist_repository(store);
        assert_eq!(repo.load().await.unwrap(), Watchlist::default());
    }

    #[tokio::test]
    async fn watchlist_roundtrip() {
        let store = memory_store();
        let repo = watchlist_repository(Arc::clone(&store));

        let mut watchlist = Watchlist::empty();
        watchlist.add("BTCUSD", InsertPosition::Prepend);
        watchlist.add("ETHUSD", InsertPosition::Prepend);
        repo.save(&watchlist).await.unwrap();

        assert_eq!(
            store.get(WATCHLIST_KEY).await.unwrap().as_deref(),
            Some(r#"["ETHUSD","BTCUSD"]"#)
        );
        assert_eq!(repo.load().await.unwrap().symbols(), &["ETHUSD", "BTCUSD"]);
    }

    #[tokio::test]
    async fn history_roundtrip() {
        let repo = history_repository(memory_store());
        assert!(repo.load().await.unwrap().is_empty());

        let mut log = HistoryLog::default();
        log.prepend(
            HistoryItem {
                id: "1-abc".to_string(),
                ticker: "XAUUSD".to_string(),
                timestamp: Utc::now(),
                current_price: dec!(3340.5),
                analysis_description: "Gold fell [1].".to_string(),
                risk_tip: String::new(),
                sources: vec![],
                market_sentiment: MarketSentiment::Bearish,
                news_summary: String::new(),
                signal: Signal::Sell,
                take_profit: dec!(3300),
                stop_loss: dec!(3360),
            },
            None,
        );
        repo.save(&log).await.unwrap();

        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded, log);
        assert_eq!(loaded.items()[0].current_price, dec!(3340.5));
    }

    #[tokio::test]
    async fn unreadable_history_is_an_error_and_kept() {
        let store = memory_store();
        let blob = r#"[{"id":"1-a","ticker":"XAUUSD","timestamp":"2025-08-14T10:00:00Z","currentPrice":"3340.5","analysisDescription":"","riskTip":"","newsSummary":"","marketSentiment":"Bearish","signal":"SELL","takeProfit":"3300","stopLoss":"3360"},{"id":"2-b","ticker":"BTCUSD","timestamp":"2025-08-14T09:00:00Z","currentPrice":"64000","analysisDescription":"","riskTip":"","newsSummary":"","marketSentiment":"Mixed","signal":"BUY","takeProfit":"66000","stopLoss":"63000"}]"#;
        store.put(HISTORY_KEY, blob.to_string()).await.unwrap();

        let repo = history_repository(Arc::clone(&store));
        assert!(matches!(repo.load().await, Err(StoreError::Json(_))));
        assert_eq!(store.get(HISTORY_KEY).await.unwrap().as_deref(), Some(blob));
    }
}
