//! Request state for the analysis and news pages.
//!
//! A page moves `Idle -> Loading -> Success | Failure`. Every `begin` issues a
//! new ticket; only the completion carrying the latest ticket is applied, so
//! a slow earlier request can never overwrite a newer one.

use std::sync::Arc;

use chrono::Utc;
use signaldesk_models::{AnalysisResult, HistoryItem, HistoryLog, NewsArticle, Source};
use signaldesk_store::{Repository, StoreError};
use tracing::{debug, info, warn};

use crate::error::{AgentError, Operation};
use crate::service::SignalService;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PageState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Failure { message: String },
}

impl<T> PageState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failure { message } => Some(message),
            _ => None,
        }
    }
}

/// Identifies one `begin` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    sequence: u64,
}

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// A successful analysis and the sources it cites.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView {
    pub result: AnalysisResult,
    pub sources: Vec<Source>,
}

struct HistoryRecorder {
    repository: Arc<dyn Repository<HistoryLog>>,
    max_entries: Option<usize>,
}

impl HistoryRecorder {
    /// Read the latest log, prepend, write the whole log back.
    async fn record(&self, item: HistoryItem) -> Result<usize, StoreError> {
        let mut log = self.repository.load().await?;
        log.prepend(item, self.max_entries);
        self.repository.save(&log).await?;
        Ok(log.len())
    }
}

pub struct AnalysisPage {
    state: PageState<AnalysisView>,
    symbol: Option<String>,
    latest: u64,
    history: Option<HistoryRecorder>,
}

impl AnalysisPage {
    /// A page that keeps no history.
    pub fn new() -> Self {
        Self {
            state: PageState::Idle,
            symbol: None,
            latest: 0,
            history: None,
        }
    }

    /// A page that snapshots every successful analysis into `repository`,
    /// newest first, keeping at most `max_entries` when set.
    pub fn with_history(
        repository: Arc<dyn Repository<HistoryLog>>,
        max_entries: Option<usize>,
    ) -> Self {
        Self {
            history: Some(HistoryRecorder {
                repository,
                max_entries,
            }),
            ..Self::new()
        }
    }

    pub fn state(&self) -> &PageState<AnalysisView> {
        &self.state
    }

    /// Symbol of the latest request, upper-cased.
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Start a request for `symbol`: clear any previous result or error and
    /// enter `Loading`.
    pub fn begin(&mut self, symbol: &str) -> RequestTicket {
        self.latest += 1;
        self.symbol = Some(symbol.trim().to_uppercase());
        self.state = PageState::Loading;
        debug!(sequence = self.latest, symbol = %symbol.trim(), "Analysis request started");
        RequestTicket {
            sequence: self.latest,
        }
    }

    /// Apply the outcome of the request identified by `ticket`. Returns
    /// `false` and changes nothing when a newer request has begun since.
    pub async fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<(AnalysisResult, Vec<Source>), AgentError>,
    ) -> bool {
        if ticket.sequence != self.latest {
            debug!(
                sequence = ticket.sequence,
                latest = self.latest,
                "Discarding stale analysis completion"
            );
            return false;
        }

        match outcome {
            Ok((result, sources)) => {
                if let Some(history) = &self.history {
                    let item = HistoryItem::from_analysis(&result, &sources, Utc::now());
                    match history.record(item).await {
                        Ok(entries) => {
                            info!(ticker = %result.ticker, entries, "Analysis saved to history")
                        }
                        Err(e) => {
                            warn!(ticker = %result.ticker, error = %e, "Failed to save analysis to history")
                        }
                    }
                }
                self.state = PageState::Success(AnalysisView { result, sources });
            }
            Err(e) => {
                let message = e.user_message(Operation::Analysis);
                warn!(error = %e, "Analysis failed");
                self.state = PageState::Failure { message };
            }
        }
        true
    }

    /// `begin`, run the analysis, `complete`.
    pub async fn submit(
        &mut self,
        service: &SignalService,
        symbol: &str,
    ) -> &PageState<AnalysisView> {
        let ticket = self.begin(symbol);
        let outcome = service.trading_strategy(symbol).await;
        self.complete(ticket, outcome).await;
        &self.state
    }
}

impl Default for AnalysisPage {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub struct NewsPage {
    state: PageState<Vec<NewsArticle>>,
    latest: u64,
}

impl NewsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PageState<Vec<NewsArticle>> {
        &self.state
    }

    pub fn begin(&mut self) -> RequestTicket {
        self.latest += 1;
        self.state = PageState::Loading;
        RequestTicket {
            sequence: self.latest,
        }
    }

    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Vec<NewsArticle>, AgentError>,
    ) -> bool {
        if ticket.sequence != self.latest {
            debug!(sequence = ticket.sequence, latest = self.latest, "Discarding stale news completion");
            return false;
        }

        self.state = match outcome {
            Ok(articles) => PageState::Success(articles),
            Err(e) => {
                warn!(error = %e, "News fetch failed");
                PageState::Failure {
                    message: e.user_message(Operation::News),
                }
            }
        };
        true
    }

    pub async fn submit(&mut self, service: &SignalService) -> &PageState<Vec<NewsArticle>> {
        let ticket = self.begin();
        let outcome = service.financial_news().await;
        self.complete(ticket, outcome);
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract_json;
    use crate::test_support::{sample_analysis_json, ScriptedModel};
    use crate::validate::parse_analysis;
    use signaldesk_store::{history_repository, KeyValueStore, MemoryStore};

    fn analysis(ticker: &str) -> AnalysisResult {
        parse_analysis(&extract_json(&sample_analysis_json(ticker, "BUY"))).unwrap()
    }

    fn history() -> Arc<dyn Repository<HistoryLog>> {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
        Arc::new(history_repository(store))
    }

    #[tokio::test]
    async fn begin_enters_loading_and_clears_previous() {
        let mut page = AnalysisPage::new();
        let ticket = page.begin("xauusd");
        page.complete(ticket, Err(AgentError::Timeout(1))).await;
        assert!(page.state().failure().is_some());

        page.begin("btcusd");
        assert!(page.state().is_loading());
        assert_eq!(page.symbol(), Some("BTCUSD"));
    }

    #[tokio::test]
    async fn stale_completion_is_ignored() {
        let mut page = AnalysisPage::new();
        let first = page.begin("XAUUSD");
        let second = page.begin("BTCUSD");
        assert!(second.sequence() > first.sequence());

        assert!(page.complete(second, Ok((analysis("BTCUSD"), vec![]))).await);
        assert!(!page.complete(first, Ok((analysis("XAUUSD"), vec![]))).await);

        let shown = page.state().success().unwrap();
        assert_eq!(shown.result.ticker, "BTCUSD");
    }

    #[tokio::test]
    async fn stale_failure_cannot_replace_loading() {
        let mut page = AnalysisPage::new();
        let first = page.begin("XAUUSD");
        page.begin("EURUSD");
        assert!(!page.complete(first, Err(AgentError::Timeout(1))).await);
        assert!(page.state().is_loading());
    }

    #[tokio::test]
    async fn failure_carries_user_message() {
        let mut page = AnalysisPage::new();
        let ticket = page.begin("DJI");
        page.complete(ticket, Err(AgentError::Parse("eof".to_string())))
            .await;
        assert_eq!(
            page.state().failure(),
            Some("Failed to parse AI response as JSON. Please try again.")
        );
    }

    #[tokio::test]
    async fn success_is_recorded_in_history() {
        let repo = history();
        let mut page = AnalysisPage::with_history(Arc::clone(&repo), None);

        let ticket = page.begin("XAUUSD");
        let sources = vec![Source::web("https://a.com", None)];
        page.complete(ticket, Ok((analysis("XAUUSD"), sources))).await;

        let log = repo.load().await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.items()[0].ticker, "XAUUSD");
        assert_eq!(log.items()[0].sources.len(), 1);
    }

    #[tokio::test]
    async fn failures_and_stale_results_are_not_recorded() {
        let repo = history();
        let mut page = AnalysisPage::with_history(Arc::clone(&repo), None);

        let stale = page.begin("XAUUSD");
        let latest = page.begin("BTCUSD");
        page.complete(stale, Ok((analysis("XAUUSD"), vec![]))).await;
        page.complete(latest, Err(AgentError::Timeout(1))).await;

        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreadable_history_is_not_overwritten() {
        use signaldesk_models::store_schema::HISTORY_KEY;

        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
        let blob = r#"[{"id":"1-a","ticker":"XAUUSD","timestamp":"2025-08-14T10:00:00Z","currentPrice":"3340.5","analysisDescription":"","riskTip":"","newsSummary":"","marketSentiment":"Bearish","signal":"SELL"},{"id":"2-b","ticker":"BTCUSD","timestamp":"2025-08-14T09:00:00Z","currentPrice":"64000","analysisDescription":"","riskTip":"","newsSummary":"","marketSentiment":"Mixed","signal":"BUY"}]"#;
        store.put(HISTORY_KEY, blob.to_string()).await.unwrap();

        let repo: Arc<dyn Repository<HistoryLog>> =
            Arc::new(history_repository(Arc::clone(&store)));
        let mut page = AnalysisPage::with_history(repo, None);
        let ticket = page.begin("EURUSD");
        page.complete(ticket, Ok((analysis("EURUSD"), vec![]))).await;

        assert!(page.state().success().is_some());
        assert_eq!(store.get(HISTORY_KEY).await.unwrap().as_deref(), Some(blob));
    }

    #[tokio::test]
    async fn history_respects_retention_cap() {
        let repo = history();
        let mut page = AnalysisPage::with_history(Arc::clone(&repo), Some(2));

        for ticker in ["XAUUSD", "BTCUSD", "EURUSD"] {
            let ticket = page.begin(ticker);
            page.complete(ticket, Ok((analysis(ticker), vec![]))).await;
        }

        let log = repo.load().await.unwrap();
        let tickers: Vec<&str> = log.items().iter().map(|i| i.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["EURUSD", "BTCUSD"]);
    }

    #[tokio::test]
    async fn submit_runs_the_pipeline() {
        let model = ScriptedModel::new().then_text(sample_analysis_json("EURUSD", "HOLD"));
        let service = SignalService::new(Arc::new(model));
        let mut page = AnalysisPage::new();

        let state = page.submit(&service, "eurusd").await;
        let view = state.success().unwrap();
        assert_eq!(view.result.strategy.entry_price, view.result.current_price);
    }

    #[tokio::test]
    async fn news_page_states() {
        let service = SignalService::new(Arc::new(ScriptedModel::new()));
        let mut page = NewsPage::new();
        assert_eq!(page.state(), &PageState::Idle);

        let state = page.submit(&service).await;
        assert_eq!(
            state.failure(),
            Some("Failed to get news from AI: script exhausted")
        );

        let stale = page.begin();
        let latest = page.begin();
        assert!(!page.complete(stale, Ok(vec![])));
        assert!(page.state().is_loading());
        assert!(page.complete(latest, Ok(vec![])));
        assert_eq!(page.state().success().map(Vec::len), Some(0));
    }
}
