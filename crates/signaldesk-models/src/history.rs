use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{AnalysisResult, MarketSentiment, Signal};
use crate::source::Source;

/// Immutable snapshot of a completed analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub ticker: String,
    pub timestamp: DateTime<Utc>,
    pub current_price: Decimal,
    pub analysis_description: String,
    pub risk_tip: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    pub market_sentiment: MarketSentiment,
    pub news_summary: String,
    #[serde(default)]
    pub signal: Signal,
    /// First take-profit level. Zero when not recorded.
    #[serde(default)]
    pub take_profit: Decimal,
    /// Zero when not recorded.
    #[serde(default)]
    pub stop_loss: Decimal,
}

impl HistoryItem {
    pub fn from_analysis(analysis: &AnalysisResult, sources: &[Source], at: DateTime<Utc>) -> Self {
        Self {
            id: history_id(at),
            ticker: analysis.ticker.clone(),
            timestamp: at,
            current_price: analysis.current_price,
            analysis_description: analysis.strategy.analysis_description.clone(),
            risk_tip: analysis.strategy.risk_tip.clone(),
            sources: sources.to_vec(),
            market_sentiment: analysis.market_sentiment,
            news_summary: analysis.news_summary.clone(),
            signal: analysis.strategy.signal,
            take_profit: analysis.strategy.take_profit1,
            stop_loss: analysis.strategy.stop_loss,
        }
    }
}

/// Millisecond timestamp plus a random suffix, so two snapshots taken in the
/// same millisecond still get distinct ids.
fn history_id(at: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", at.timestamp_millis(), &suffix[..9])
}

/// Whether the user confirmed a destructive action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// Analysis history, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct HistoryLog {
    items: Vec<HistoryItem>,
}

impl HistoryLog {
    pub fn new(items: Vec<HistoryItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Put `item` at the front. With a retention cap, the oldest entries
    /// beyond it are dropped.
    pub fn prepend(&mut self, item: HistoryItem, max_entries: Option<usize>) {
        self.items.insert(0, item);
        if let Some(max) = max_entries {
            self.items.truncate(max);
        }
    }

    /// Remove every entry. Returns false and leaves the log untouched unless
    /// the clear was confirmed.
    pub fn clear(&mut self, confirmation: Confirmation) -> bool {
        match confirmation {
            Confirmation::Confirmed => {
                self.items.clear();
                true
            }
            Confirmation::Declined => false,
        }
    }

    /// Entries whose ticker contains `query`, ignoring case.
    pub fn filter_by_ticker(&self, query: &str) -> Vec<&HistoryItem> {
        let needle = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| item.ticker.to_lowercase().contains(&needle))
            .collect()
    }
}
