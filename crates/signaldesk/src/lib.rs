//! SignalDesk - AI trading signal desk
//!
//! Asks a generative model for a trading analysis of a symbol (or a digest of
//! financial news), validates the JSON it returns into typed results, and
//! keeps an analysis history and watchlist in a local key-value store.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use signaldesk::models::{DeskConfig, AnalysisResult, Watchlist};
//! use signaldesk::agents::{SignalService, AnalysisPage, render_narrative};
//! use signaldesk::store::{SqliteStore, CachedStore, history_repository};
//! ```

pub use signaldesk_agents as agents;
pub use signaldesk_models as models;
pub use signaldesk_store as store;

pub mod render;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use signaldesk_agents::{
    ClaudeCliConfig, ClaudeCliModel, GeminiConfig, GeminiModel, GenerativeModel, SignalService,
};
use signaldesk_models::{DeskConfig, ModelConfig, ProviderKind, StoreConfig};
use signaldesk_store::{CachedStore, KeyValueStore, SqliteStore};
use tracing::{debug, info};

/// Config file read when `--config` is not given. Missing is fine.
pub const DEFAULT_CONFIG_PATH: &str = "config/signaldesk.toml";

/// Load configuration. An explicit path must exist; without one the default
/// path is tried and built-in defaults are used when it is absent.
pub fn load_config(path: Option<&str>) -> Result<DeskConfig, anyhow::Error> {
    let path = match path {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => DEFAULT_CONFIG_PATH,
        None => {
            debug!("No config file, using defaults");
            return Ok(DeskConfig::default());
        }
    };

    let config_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {path}"))?;
    toml::from_str(&config_str).with_context(|| format!("Failed to parse config: {path}"))
}

/// Build the configured model backend.
pub fn build_model(config: &ModelConfig) -> Result<Arc<dyn GenerativeModel>, anyhow::Error> {
    let model: Arc<dyn GenerativeModel> = match config.provider {
        ProviderKind::Gemini => Arc::new(
            GeminiModel::new(GeminiConfig::from_model_config(config))
                .context("Failed to build Gemini client")?,
        ),
        ProviderKind::ClaudeCli => Arc::new(ClaudeCliModel::new(
            ClaudeCliConfig::from_model_config(config),
        )),
    };
    info!(provider = ?config.provider, model = %model.name(), "Model backend ready");
    Ok(model)
}

pub fn build_service(config: &DeskConfig) -> Result<SignalService, anyhow::Error> {
    let model = build_model(&config.model)?;
    Ok(SignalService::from_config(model, &config.model))
}

/// Open the SQLite store with its hot layer, creating the parent directory
/// if needed.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, anyhow::Error> {
    if let Some(parent) = Path::new(&config.sqlite_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let sqlite = SqliteStore::open(&config.sqlite_path)
        .with_context(|| format!("Failed to open store: {}", config.sqlite_path))?;
    Ok(Arc::new(CachedStore::new(sqlite, config.memory_max_capacity)))
}
