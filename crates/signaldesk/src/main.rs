use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use signaldesk::agents::{AnalysisPage, NewsPage, PageState};
use signaldesk::models::{Confirmation, DeskConfig, HistoryLog};
use signaldesk::render;
use signaldesk::store::{history_repository, watchlist_repository, KeyValueStore, Repository};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "signaldesk", about = "AI trading signal desk")]
struct Cli {
    /// Path to configuration file [default: config/signaldesk.toml if present]
    #[arg(short, long)]
    config: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a symbol and record the result in history
    Analyze { symbol: String },
    /// Show the latest financial news
    News,
    /// Show past analyses, newest first
    History {
        /// Only show tickers containing this text
        #[arg(long)]
        search: Option<String>,

        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
    /// Show or edit the watchlist
    Watchlist {
        #[command(subcommand)]
        action: Option<WatchlistAction>,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// Delete every history entry
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum WatchlistAction {
    List,
    Add { symbol: String },
    Remove { symbol: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = signaldesk::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Analyze { symbol } => analyze(&config, &symbol, cli.json).await,
        Command::News => news(&config, cli.json).await,
        Command::History { search, action } => {
            let store = signaldesk::open_store(&config.store)?;
            match action {
                Some(HistoryAction::Clear { yes }) => clear_history(store, yes).await,
                None => show_history(store, search.as_deref(), cli.json).await,
            }
        }
        Command::Watchlist { action } => {
            let store = signaldesk::open_store(&config.store)?;
            watchlist(&config, store, action.unwrap_or(WatchlistAction::List), cli.json).await
        }
    }
}

async fn analyze(config: &DeskConfig, symbol: &str, json: bool) -> Result<()> {
    let service = signaldesk::build_service(config)?;
    let mut page = if config.history.enabled {
        let store = signaldesk::open_store(&config.store)?;
        AnalysisPage::with_history(
            Arc::new(history_repository(store)),
            config.history.max_entries,
        )
    } else {
        AnalysisPage::new()
    };

    match page.submit(&service, symbol).await {
        PageState::Success(view) => {
            if json {
                let output = serde_json::json!({
                    "analysis": view.result,
                    "sources": view.sources,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print!("{}", render::render_analysis(view));
            }
            Ok(())
        }
        PageState::Failure { message } => bail!("{message}"),
        PageState::Idle | PageState::Loading => bail!("Analysis did not complete"),
    }
}

async fn news(config: &DeskConfig, json: bool) -> Result<()> {
    let service = signaldesk::build_service(config)?;
    let mut page = NewsPage::new();

    match page.submit(&service).await {
        PageState::Success(articles) => {
            if json {
                println!("{}", serde_json::to_string_pretty(articles)?);
            } else {
                println!("{}", render::render_news(articles, Utc::now()));
            }
            Ok(())
        }
        PageState::Failure { message } => bail!("{message}"),
        PageState::Idle | PageState::Loading => bail!("News fetch did not complete"),
    }
}

async fn show_history(
    store: Arc<dyn KeyValueStore>,
    search: Option<&str>,
    json: bool,
) -> Result<()> {
    let log = history_repository(store)
        .load()
        .await
        .context("Failed to load history")?;

    let items: Vec<_> = match search {
        Some(query) => log.filter_by_ticker(query),
        None => log.items().iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        println!("{}", render::render_history(&items, Utc::now()));
    }
    Ok(())
}

async fn clear_history(store: Arc<dyn KeyValueStore>, yes: bool) -> Result<()> {
    let repository = history_repository(store);
    let mut log = match repository.load().await {
        Ok(log) => log,
        // A confirmed clear may replace a log that no longer reads.
        Err(e) if yes => {
            warn!(error = %e, "History is unreadable, clearing it anyway");
            HistoryLog::default()
        }
        Err(e) => return Err(e).context("Failed to load history"),
    };

    let confirmation = if yes {
        Confirmation::Confirmed
    } else {
        Confirmation::Declined
    };
    if log.clear(confirmation) {
        repository
            .save(&log)
            .await
            .context("Failed to save history")?;
        println!("History cleared.");
    } else {
        println!("History not cleared. Pass --yes to confirm.");
    }
    Ok(())
}

async fn watchlist(
    config: &DeskConfig,
    store: Arc<dyn KeyValueStore>,
    action: WatchlistAction,
    json: bool,
) -> Result<()> {
    let repository = watchlist_repository(store);
    let mut watchlist = repository
        .load()
        .await
        .context("Failed to load watchlist")?;

    let changed = match &action {
        WatchlistAction::List => false,
        WatchlistAction::Add { symbol } => {
            let added = watchlist.add(symbol, config.watchlist.insert_position);
            if !added {
                eprintln!("{} is already on the watchlist or is blank", symbol.trim());
            }
            added
        }
        WatchlistAction::Remove { symbol } => {
            let removed = watchlist.remove(symbol);
            if !removed {
                eprintln!("{} is not on the watchlist", symbol.trim());
            }
            removed
        }
    };

    if changed {
        repository
            .save(&watchlist)
            .await
            .context("Failed to save watchlist")?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&watchlist)?);
    } else {
        println!("{}", render::render_watchlist(&watchlist));
    }
    Ok(())
}
