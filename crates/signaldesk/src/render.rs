//! Plain-text views for the terminal.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use signaldesk_agents::citation::source_host;
use signaldesk_agents::{render_narrative, source_display_title, AnalysisView};
use signaldesk_models::{HistoryItem, NewsArticle, Signal, Source, Watchlist};

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const MONTH: i64 = 2_592_000;
const YEAR: i64 = 31_536_000;

/// "just now", "5 minutes ago", "1 day ago". Future times read as "just now".
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 30 {
        return "just now".to_string();
    }

    let (count, unit) = [(YEAR, "year"), (MONTH, "month"), (DAY, "day"), (HOUR, "hour"), (MINUTE, "minute")]
        .into_iter()
        .find(|(size, _)| seconds > *size)
        .map(|(size, unit)| (seconds / size, unit))
        .unwrap_or((seconds, "second"));

    let plural = if count > 1 { "s" } else { "" };
    format!("{count} {unit}{plural} ago")
}

pub fn render_analysis(view: &AnalysisView) -> String {
    let result = &view.result;
    let strategy = &result.strategy;
    let mut out = String::new();

    let _ = writeln!(out, "{}  {}  ({}% confidence)", result.ticker, strategy.signal, strategy.confidence);
    let _ = writeln!(out, "Current price: {}", result.current_price);
    if !strategy.description.is_empty() {
        let _ = writeln!(out, "{}", strategy.description);
    }
    if strategy.signal != Signal::Hold {
        for (label, price) in strategy.price_levels() {
            let _ = writeln!(out, "  {label:<14} {price}");
        }
    }
    if let Some(host) = view.sources.first().and_then(Source::uri).and_then(source_host) {
        let _ = writeln!(out, "Data from: {host}");
    }

    let _ = writeln!(out, "\nMarket sentiment: {}", result.market_sentiment);
    let _ = writeln!(
        out,
        "RSI: {} ({:?})",
        result.rsi.value, result.rsi.interpretation
    );
    let _ = writeln!(
        out,
        "MA50: {}  MA200: {}",
        result.moving_averages.ma50, result.moving_averages.ma200
    );
    let levels: Vec<String> = result
        .pivot_points
        .levels()
        .iter()
        .map(|(label, value)| format!("{label} {value}"))
        .collect();
    let _ = writeln!(out, "Pivots: {}", levels.join("  "));
    if !result.historical_data.is_empty() {
        let _ = writeln!(out, "Candles: {} hourly bars", result.historical_data.len());
    }

    section(&mut out, "Analysis", &render_narrative(&strategy.analysis_description, &view.sources).to_markdown());
    section(&mut out, "Risk", &render_narrative(&strategy.risk_tip, &view.sources).to_markdown());
    section(&mut out, "News", &result.news_summary);
    section(&mut out, "Sources", &render_sources(&view.sources));

    out
}

fn section(out: &mut String, title: &str, body: &str) {
    if body.trim().is_empty() {
        return;
    }
    let _ = write!(out, "\n## {title}\n\n{}\n", body.trim_end());
}

/// Numbered to match the citation markers.
pub fn render_sources(sources: &[Source]) -> String {
    sources
        .iter()
        .enumerate()
        .filter_map(|(i, source)| {
            let uri = source.uri()?;
            Some(format!("[{}] {} <{uri}>", i + 1, source_display_title(source)))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_news(articles: &[NewsArticle], now: DateTime<Utc>) -> String {
    if articles.is_empty() {
        return "No news articles found.".to_string();
    }

    let mut out = String::new();
    for article in articles {
        let when = article
            .published_date
            .map(|d| format_relative_time(d, now))
            .unwrap_or_else(|| "date unknown".to_string());
        let source = if article.source_name.is_empty() {
            source_host(&article.source_url).unwrap_or_default()
        } else {
            article.source_name.clone()
        };
        let _ = writeln!(out, "{}\n  {source} · {when}", article.title);
        if !article.summary.is_empty() {
            let _ = writeln!(out, "  {}", article.summary);
        }
        let _ = writeln!(out, "  {}\n", article.source_url);
    }
    out.trim_end().to_string()
}

pub fn render_history(items: &[&HistoryItem], now: DateTime<Utc>) -> String {
    if items.is_empty() {
        return "No analysis history.".to_string();
    }

    items
        .iter()
        .map(|item| {
            format!(
                "{:<10} {:<4} {:<8} price {}  TP {}  SL {}  {}",
                item.ticker,
                item.signal.as_str(),
                item.market_sentiment.as_str(),
                item.current_price,
                item.take_profit,
                item.stop_loss,
                format_relative_time(item.timestamp, now)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_watchlist(watchlist: &Watchlist) -> String {
    if watchlist.is_empty() {
        return "Watchlist is empty.".to_string();
    }
    watchlist.symbols().join("\n")
}
