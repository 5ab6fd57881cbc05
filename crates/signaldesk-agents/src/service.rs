use std::sync::Arc;
use std::time::Instant;

use signaldesk_models::{AnalysisResult, ModelConfig, NewsArticle, Source};
use tracing::{info, warn};

use crate::error::AgentError;
use crate::model::{GenerationRequest, GenerativeModel};
use crate::parser::extract_json;
use crate::prompts::{build_analysis_prompt, build_news_prompt};
use crate::validate::{parse_analysis, parse_news_articles, sources_from_grounding};

pub const EMPTY_ANALYSIS_MESSAGE: &str = "The AI returned an empty or invalid response. This could \
    be due to a content safety block or an issue with the model. Please try a different asset or \
    try again later.";

pub const EMPTY_NEWS_MESSAGE: &str =
    "The AI returned an empty or invalid response while fetching news. Please try again later.";

/// Runs the ingestion pipeline against a generative model: prompt, call,
/// extract, validate.
pub struct SignalService {
    model: Arc<dyn GenerativeModel>,
    analysis_temperature: f32,
    news_temperature: f32,
}

impl SignalService {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            analysis_temperature: 0.3,
            news_temperature: 0.1,
        }
    }

    pub fn from_config(model: Arc<dyn GenerativeModel>, config: &ModelConfig) -> Self {
        Self {
            model,
            analysis_temperature: config.analysis_temperature,
            news_temperature: config.news_temperature,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Ask the model for a trading analysis of `symbol`. Returns the typed
    /// result and the web sources the model cited, in grounding order.
    pub async fn trading_strategy(
        &self,
        symbol: &str,
    ) -> Result<(AnalysisResult, Vec<Source>), AgentError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(AgentError::InvalidRequest(
                "Please enter a symbol to analyze.".to_string(),
            ));
        }

        let start = Instant::now();
        info!(symbol = %symbol, model = %self.model.name(), "Starting analysis");

        let request = GenerationRequest {
            prompt: build_analysis_prompt(symbol),
            web_search: true,
            temperature: self.analysis_temperature,
        };
        let response = self.model.generate(&request).await.inspect_err(|e| {
            warn!(symbol = %symbol, error = %e, "Analysis model call failed");
        })?;

        let text = response
            .non_blank_text()
            .ok_or_else(|| AgentError::EmptyResponse(EMPTY_ANALYSIS_MESSAGE.to_string()))?;

        let result = parse_analysis(&extract_json(text)).inspect_err(|e| {
            warn!(symbol = %symbol, error = %e, "Analysis response rejected");
        })?;
        let sources = sources_from_grounding(&response.grounding_chunks);

        info!(
            symbol = %symbol,
            ticker = %result.ticker,
            signal = %result.strategy.signal,
            confidence = result.strategy.confidence,
            sources = sources.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Analysis complete"
        );

        Ok((result, sources))
    }

    /// Ask the model for a digest of recent financial news, newest first.
    pub async fn financial_news(&self) -> Result<Vec<NewsArticle>, AgentError> {
        let start = Instant::now();
        info!(model = %self.model.name(), "Fetching financial news");

        let request = GenerationRequest {
            prompt: build_news_prompt(),
            web_search: true,
            temperature: self.news_temperature,
        };
        let response = self.model.generate(&request).await.inspect_err(|e| {
            warn!(error = %e, "News model call failed");
        })?;

        let text = response
            .non_blank_text()
            .ok_or_else(|| AgentError::EmptyResponse(EMPTY_NEWS_MESSAGE.to_string()))?;

        let articles = parse_news_articles(&extract_json(text)).inspect_err(|e| {
            warn!(error = %e, "News response rejected");
        })?;

        info!(
            articles = articles.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "News fetched"
        );

        Ok(articles)
    }
}
