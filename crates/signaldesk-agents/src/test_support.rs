//! Test support: a scripted model and realistic response fixtures.
//!
//! `ScriptedModel` replays queued outcomes in order and records every request
//! it receives, so pipeline and page tests run without network access.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::json;
use signaldesk_models::{GroundingChunk, GroundingWeb};
use tokio::sync::Mutex;

use crate::error::AgentError;
use crate::model::{GenerationRequest, GenerationResponse, GenerativeModel};

/// A model that answers from a script. Once the script runs out every call
/// fails with a transport error.
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<GenerationResponse, AgentError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn then_response(mut self, response: GenerationResponse) -> Self {
        self.script.get_mut().push_back(Ok(response));
        self
    }

    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.then_response(GenerationResponse::text(text))
    }

    pub fn then_error(mut self, error: AgentError) -> Self {
        self.script.get_mut().push_back(Err(error));
        self
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, AgentError> {
        self.requests.lock().await.push(request.clone());
        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Transport("script exhausted".to_string())))
    }
}

/// Grounding chunks with web references for each uri, untitled.
pub fn web_chunks(uris: &[&str]) -> Vec<GroundingChunk> {
    uris.iter()
        .map(|uri| GroundingChunk {
            web: Some(GroundingWeb {
                uri: Some(uri.to_string()),
                title: None,
            }),
        })
        .collect()
}

/// Wrap a payload in a markdown json fence, the way models often answer.
pub fn fenced(json: &str) -> String {
    format!("Here is the analysis you asked for:\n```json\n{json}\n```\n")
}

/// A complete analysis payload. `signal` is passed through verbatim so
/// tests can exercise unrecognized labels.
pub fn sample_analysis_json(ticker: &str, signal: &str) -> String {
    json!({
        "ticker": ticker,
        "currentPrice": 3341.25,
        "pivotPoints": {"s3": 3280.0, "s2": 3290.5, "s1": 3300.0, "pp": 3314.0, "r1": 3331.0, "r2": 3350.0, "r3": 3361.5},
        "rsi": {"value": 44.8, "interpretation": "Neutral"},
        "movingAverages": {"ma50": 3325.4, "ma200": 3190.1},
        "strategy": {
            "signal": signal,
            "description": "Dollar strength caps upside while rate-cut bets limit the downside.",
            "entryPrice": 3340.0,
            "stopLoss": 3362.0,
            "takeProfit1": 3314.0,
            "takeProfit2": 3300.0,
            "confidence": 72,
            "analysisDescription": "The US Dollar (DXY) trades around 98.30[1].\nSupport sits near $3314 and $3307[2,3], resistance at $3350[9].",
            "riskTip": "CPI prints tomorrow[1]. Keep position sizes small."
        },
        "marketSentiment": "Bearish",
        "newsSummary": "Markets price an 85% chance of a September cut.",
        "historicalData": [
            {"time": "2025-08-14T08:00:00Z", "open": 3348.0, "high": 3352.0, "low": 3343.0, "close": 3345.0},
            {"time": "2025-08-14T09:00:00Z", "open": 3345.0, "high": 3350.0, "low": 3338.0, "close": 3342.0},
            {"time": "2025-08-14T10:00:00Z", "open": 3342.0, "high": 3346.0, "low": 3336.0, "close": 3341.25}
        ]
    })
    .to_string()
}

/// A news payload with three dated articles, deliberately out of order, and
/// one article missing its URL.
pub fn sample_news_json() -> String {
    json!([
        {
            "title": "Gold slips as dollar firms ahead of CPI",
            "summary": "Bullion eased for a second session.",
            "sourceName": "Reuters",
            "sourceUrl": "https://www.reuters.com/markets/commodities/gold-slips",
            "publishedDate": "2025-08-14T07:15:00Z"
        },
        {
            "title": "Bitcoin tops $120,000",
            "summary": "Crypto rallied on ETF inflows.",
            "sourceName": "CoinDesk",
            "sourceUrl": "https://www.coindesk.com/markets/btc-120k",
            "publishedDate": "2025-08-14T11:40:00Z"
        },
        {
            "title": "Euro steady after ZEW survey",
            "summary": "EUR/USD held near 1.1650.",
            "sourceName": "FXStreet",
            "sourceUrl": "https://www.fxstreet.com/news/eurusd-zew",
            "publishedDate": "2025-08-14T09:05:00Z"
        },
        {
            "title": "Oil rises on supply worries",
            "summary": "Brent gained 1%.",
            "sourceName": "Bloomberg"
        }
    ])
    .to_string()
}
