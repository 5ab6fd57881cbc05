pub mod analysis;
pub mod config;
pub mod history;
pub mod news;
pub mod source;
pub mod store_schema;
pub mod watchlist;

pub use analysis::{
    AnalysisResult, Candle, MarketSentiment, MovingAverages, PivotPoints, Rsi, RsiInterpretation,
    Signal, Strategy,
};
pub use config::{DeskConfig, HistoryConfig, ModelConfig, ProviderKind, StoreConfig, WatchlistConfig};
pub use history::{Confirmation, HistoryItem, HistoryLog};
pub use news::NewsArticle;
pub use source::{GroundingChunk, GroundingWeb, Source, WebSource};
pub use store_schema::KvRow;
pub use watchlist::{InsertPosition, Watchlist};
