use serde::{Deserialize, Serialize};

use crate::watchlist::InsertPosition;

/// Top-level configuration for SignalDesk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DeskConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub watchlist: WatchlistConfig,
}

/// Which generative model backend answers the prompts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Gemini REST API with Google Search grounding.
    #[default]
    Gemini,
    /// Local `claude` CLI. Returns no grounding chunks.
    ClaudeCli,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key. Never stored in the file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_analysis_temperature")]
    pub analysis_temperature: f32,
    #[serde(default = "default_news_temperature")]
    pub news_temperature: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            analysis_temperature: default_analysis_temperature(),
            news_temperature: default_news_temperature(),
        }
    }
}

/// Configuration for the persisted key-value store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Path to the SQLite file holding history and watchlist blobs.
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
    /// Maximum number of blobs kept in the in-memory hot layer.
    #[serde(default = "default_memory_capacity")]
    pub memory_max_capacity: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sqlite_path: default_sqlite_path(),
            memory_max_capacity: default_memory_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryConfig {
    /// Record a history entry for every successful analysis.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Retention cap. None keeps everything.
    #[serde(default)]
    pub max_entries: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WatchlistConfig {
    #[serde(default)]
    pub insert_position: InsertPosition,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_timeout() -> u64 {
    90
}
fn default_analysis_temperature() -> f32 {
    0.3
}
fn default_news_temperature() -> f32 {
    0.1
}
fn default_sqlite_path() -> String {
    "data/signaldesk.db".to_string()
}
fn default_memory_capacity() -> u64 {
    64
}
fn default_true() -> bool {
    true
}
