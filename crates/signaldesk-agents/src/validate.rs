//! Coerce model JSON into typed results.
//!
//! The model is an untrusted text generator, so nothing here casts blindly:
//! required numbers are checked, enums fall back to safe defaults, and every
//! problem is reported with its JSON path.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde_json::Value;
use signaldesk_models::news::sort_newest_first;
use signaldesk_models::{
    AnalysisResult, Candle, GroundingChunk, MarketSentiment, MovingAverages, NewsArticle,
    PivotPoints, Rsi, RsiInterpretation, Signal, Source, Strategy,
};
use tracing::{debug, warn};

use crate::error::{AgentError, FieldErrors};
use crate::parser::parse_json_value;

/// Parse and validate an analysis payload.
pub fn parse_analysis(json_text: &str) -> Result<AnalysisResult, AgentError> {
    let value = parse_json_value(json_text)?;
    validate_analysis(&value).map_err(AgentError::Invalid)
}

/// Parse and validate a news payload. Articles come back newest first.
pub fn parse_news_articles(json_text: &str) -> Result<Vec<NewsArticle>, AgentError> {
    let value = parse_json_value(json_text)?;
    validate_news(&value).map_err(AgentError::Invalid)
}

/// Keep grounding chunks that carry a web uri, in their original order.
/// Duplicates stay: citation numbers index into this list positionally.
pub fn sources_from_grounding(chunks: &[GroundingChunk]) -> Vec<Source> {
    chunks
        .iter()
        .filter_map(|chunk| {
            let web = chunk.web.as_ref()?;
            let uri = web.uri.as_deref().filter(|u| !u.is_empty())?;
            Some(Source::web(uri, web.title.clone()))
        })
        .collect()
}

/// Validate a decoded analysis object.
pub fn validate_analysis(value: &Value) -> Result<AnalysisResult, FieldErrors> {
    let mut check = Checker::default();
    if !value.is_object() {
        check.errors.push("$", "expected a JSON object");
        return Err(check.errors);
    }

    let ticker = check.required_string(value, "", "ticker");
    let current_price = check.required_positive(value, "", "currentPrice");

    let pivot_points = check
        .required_object(value, "", "pivotPoints")
        .and_then(|p| check.pivot_points(p));
    if pivot_points.as_ref().is_some_and(|p| !p.is_ordered()) {
        warn!("Pivot levels are not in ascending order");
    }

    let rsi = check
        .required_object(value, "", "rsi")
        .and_then(|r| check.rsi(r));

    let moving_averages = check
        .required_object(value, "", "movingAverages")
        .and_then(|m| {
            let ma50 = check.required_positive(m, "movingAverages", "ma50");
            let ma200 = check.required_positive(m, "movingAverages", "ma200");
            Some(MovingAverages {
                ma50: ma50?,
                ma200: ma200?,
            })
        });

    let strategy_value = check.required_object(value, "", "strategy");
    let strategy = strategy_value.and_then(|s| check.strategy(s, current_price));

    let market_sentiment = match optional_str(value, "marketSentiment") {
        Some(label) => MarketSentiment::from_label(label).unwrap_or_else(|| {
            warn!(label, "Unrecognized market sentiment, treating as Neutral");
            MarketSentiment::Neutral
        }),
        None => MarketSentiment::Neutral,
    };

    // The original prompt nested newsSummary under strategy; accept both.
    let news_summary = optional_str(value, "newsSummary")
        .or_else(|| strategy_value.and_then(|s| optional_str(s, "newsSummary")))
        .unwrap_or_default()
        .to_string();

    let historical_data = candles(value.get("historicalData"));

    match (ticker, current_price, pivot_points, rsi, moving_averages, strategy) {
        (Some(ticker), Some(current_price), Some(pivot_points), Some(rsi), Some(moving_averages), Some(strategy))
            if check.errors.is_empty() =>
        {
            Ok(AnalysisResult {
                ticker,
                current_price,
                pivot_points,
                rsi,
                moving_averages,
                strategy,
                market_sentiment,
                news_summary,
                historical_data,
            })
        }
        _ => Err(check.errors),
    }
}

/// Validate a decoded news payload: a bare array, or an object wrapping the
/// array under `articles`.
pub fn validate_news(value: &Value) -> Result<Vec<NewsArticle>, FieldErrors> {
    let items: &[Value] = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("articles") {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => &[],
            Some(_) => {
                let mut errors = FieldErrors::default();
                errors.push("articles", "expected an array");
                return Err(errors);
            }
        },
        Value::Null => &[],
        _ => {
            let mut errors = FieldErrors::default();
            errors.push("$", "expected an array of articles");
            return Err(errors);
        }
    };

    let mut articles: Vec<NewsArticle> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let article = news_article(item);
            if article.is_none() {
                warn!(index = i, "Skipping news article without title or URL");
            }
            article
        })
        .collect();

    sort_newest_first(&mut articles);
    debug!(count = articles.len(), "Validated news articles");
    Ok(articles)
}

fn news_article(item: &Value) -> Option<NewsArticle> {
    let title = optional_str(item, "title").filter(|t| !t.is_empty())?;
    let source_url = optional_str(item, "sourceUrl").filter(|u| !u.is_empty())?;
    Some(NewsArticle {
        title: title.to_string(),
        summary: optional_str(item, "summary").unwrap_or_default().to_string(),
        source_name: optional_str(item, "sourceName")
            .unwrap_or_default()
            .to_string(),
        source_url: source_url.to_string(),
        published_date: item.get("publishedDate").and_then(parse_timestamp),
    })
}

/// Malformed bars are dropped rather than failing the whole analysis; the
/// chart simply has a gap.
fn candles(value: Option<&Value>) -> Vec<Candle> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let candle = candle(item);
            if candle.is_none() {
                warn!(index = i, "Skipping malformed candle");
            }
            candle
        })
        .collect()
}

fn candle(item: &Value) -> Option<Candle> {
    Some(Candle {
        time: item.get("time").and_then(parse_timestamp)?,
        open: item.get("open").and_then(to_decimal)?,
        high: item.get("high").and_then(to_decimal)?,
        low: item.get("low").and_then(to_decimal)?,
        close: item.get("close").and_then(to_decimal)?,
    })
}

#[derive(Default)]
struct Checker {
    errors: FieldErrors,
}

impl Checker {
    fn required_object<'v>(&mut self, parent: &'v Value, path: &str, key: &str) -> Option<&'v Value> {
        match field(parent, key) {
            Some(v) if v.is_object() => Some(v),
            Some(_) => {
                self.errors.push(join(path, key), "expected an object");
                None
            }
            None => {
                self.errors.push(join(path, key), "missing");
                None
            }
        }
    }

    fn required_string(&mut self, parent: &Value, path: &str, key: &str) -> Option<String> {
        match field(parent, key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::String(_)) => {
                self.errors.push(join(path, key), "blank");
                None
            }
            Some(_) => {
                self.errors.push(join(path, key), "expected a string");
                None
            }
            None => {
                self.errors.push(join(path, key), "missing");
                None
            }
        }
    }

    fn required_number(&mut self, parent: &Value, path: &str, key: &str) -> Option<Decimal> {
        match field(parent, key) {
            Some(v) => {
                let number = to_decimal(v);
                if number.is_none() {
                    self.errors.push(join(path, key), "not a finite number");
                }
                number
            }
            None => {
                self.errors.push(join(path, key), "missing");
                None
            }
        }
    }

    fn required_positive(&mut self, parent: &Value, path: &str, key: &str) -> Option<Decimal> {
        let number = self.required_number(parent, path, key)?;
        if number <= Decimal::ZERO {
            self.errors.push(join(path, key), "must be positive");
            return None;
        }
        Some(number)
    }

    fn pivot_points(&mut self, p: &Value) -> Option<PivotPoints> {
        let path = "pivotPoints";
        let s3 = self.required_number(p, path, "s3");
        let s2 = self.required_number(p, path, "s2");
        let s1 = self.required_number(p, path, "s1");
        let pp = self.required_number(p, path, "pp");
        let r1 = self.required_number(p, path, "r1");
        let r2 = self.required_number(p, path, "r2");
        let r3 = self.required_number(p, path, "r3");
        Some(PivotPoints {
            s3: s3?,
            s2: s2?,
            s1: s1?,
            pp: pp?,
            r1: r1?,
            r2: r2?,
            r3: r3?,
        })
    }

    fn rsi(&mut self, r: &Value) -> Option<Rsi> {
        let value = self
            .required_number(r, "rsi", "value")?
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        let interpretation = optional_str(r, "interpretation")
            .and_then(RsiInterpretation::from_label)
            .unwrap_or_else(|| RsiInterpretation::from_value(value));
        Some(Rsi {
            value,
            interpretation,
        })
    }

    /// HOLD strategies take `current_price` for every level, whatever the
    /// model sent.
    fn strategy(&mut self, s: &Value, current_price: Option<Decimal>) -> Option<Strategy> {
        let path = "strategy";
        let signal = match optional_str(s, "signal") {
            Some(label) => Signal::from_label(label).unwrap_or_else(|| {
                warn!(label, "Unrecognized signal, treating as HOLD");
                Signal::Hold
            }),
            None => Signal::Hold,
        };

        let confidence = field(s, "confidence")
            .and_then(to_decimal)
            .map(|c| c.round().clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
            .and_then(|c| c.to_u8())
            .unwrap_or(0);

        let text = |key: &str| optional_str(s, key).unwrap_or_default().to_string();

        let (entry_price, stop_loss, take_profit1, take_profit2) = if signal == Signal::Hold {
            let price = current_price?;
            (Some(price), Some(price), Some(price), Some(price))
        } else {
            (
                self.required_number(s, path, "entryPrice"),
                self.required_number(s, path, "stopLoss"),
                self.required_number(s, path, "takeProfit1"),
                self.required_number(s, path, "takeProfit2"),
            )
        };

        Some(Strategy {
            signal,
            description: text("description"),
            entry_price: entry_price?,
            stop_loss: stop_loss?,
            take_profit1: take_profit1?,
            take_profit2: take_profit2?,
            confidence,
            analysis_description: text("analysisDescription"),
            risk_tip: text("riskTip"),
        })
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// A present, non-null field.
fn field<'v>(parent: &'v Value, key: &str) -> Option<&'v Value> {
    parent.get(key).filter(|v| !v.is_null())
}

fn optional_str<'v>(parent: &'v Value, key: &str) -> Option<&'v str> {
    parent.get(key).and_then(Value::as_str).map(str::trim)
}

/// JSON numbers, or numeric strings such as "3,314.50" or "$98.4".
fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(Decimal::from(i));
            }
            decimal_from_text(&n.to_string()).or_else(|| n.as_f64().and_then(Decimal::from_f64))
        }
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .trim_start_matches('$')
                .chars()
                .filter(|c| *c != ',')
                .collect();
            decimal_from_text(&cleaned)
        }
        _ => None,
    }
}

fn decimal_from_text(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// RFC 3339, a zone-less ISO 8601 datetime (read as UTC), or epoch
/// seconds/milliseconds.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => {
            let raw = n.as_i64()?;
            // Anything past year 5000 in seconds is really milliseconds.
            if raw.unsigned_abs() > 100_000_000_000 {
                Utc.timestamp_millis_opt(raw).single()
            } else {
                Utc.timestamp_opt(raw, 0).single()
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use signaldesk_models::GroundingWeb;

    fn sample_analysis() -> Value {
        json!({
            "ticker": "XAUUSD",
            "currentPrice": 3341.25,
            "pivotPoints": {"s3": 3280, "s2": 3290, "s1": 3300, "pp": 3314, "r1": 3331, "r2": 3350, "r3": 3361},
            "rsi": {"value": 44.8, "interpretation": "Neutral"},
            "movingAverages": {"ma50": 3325.4, "ma200": 3190.1},
            "strategy": {
                "signal": "SELL",
                "description": "Dollar strength caps gold.",
                "entryPrice": 3340,
                "stopLoss": 3362,
                "takeProfit1": 3314,
                "takeProfit2": 3300,
                "confidence": 72,
                "analysisDescription": "DXY near 98.30[1].\nSupport at $3314[2,3].",
                "riskTip": "CPI due tomorrow[4]."
            },
            "marketSentiment": "Bearish",
            "newsSummary": "Fed cut bets firm.",
            "historicalData": [
                {"time": "2025-08-14T09:00:00Z", "open": 3345, "high": 3350, "low": 3338, "close": 3342},
                {"time": "2025-08-14T10:00:00Z", "open": 3342, "high": 3346, "low": 3336, "close": 3341.25}
            ]
        })
    }

    #[test]
    fn validates_complete_analysis() {
        let result = validate_analysis(&sample_analysis()).unwrap();
        assert_eq!(result.ticker, "XAUUSD");
        assert_eq!(result.current_price, dec!(3341.25));
        assert_eq!(result.pivot_points.pp, dec!(3314));
        assert_eq!(result.rsi.value, dec!(44.8));
        assert_eq!(result.rsi.interpretation, RsiInterpretation::Neutral);
        assert_eq!(result.strategy.signal, Signal::Sell);
        assert_eq!(result.strategy.stop_loss, dec!(3362));
        assert_eq!(result.strategy.confidence, 72);
        assert_eq!(result.market_sentiment, MarketSentiment::Bearish);
        assert_eq!(result.news_summary, "Fed cut bets firm.");
        assert_eq!(result.historical_data.len(), 2);
        assert_eq!(result.historical_data[1].close, dec!(3341.25));
    }

    #[test]
    fn parse_analysis_distinguishes_syntax_from_shape() {
        assert!(matches!(
            parse_analysis("{\"ticker\": "),
            Err(AgentError::Parse(_))
        ));
        assert!(matches!(
            parse_analysis("{\"ticker\": \"BTCUSD\"}"),
            Err(AgentError::Invalid(_))
        ));
        assert!(parse_analysis(&sample_analysis().to_string()).is_ok());
    }

    #[test]
    fn hold_collapses_prices_to_current() {
        let mut value = sample_analysis();
        value["strategy"]["signal"] = json!("HOLD");
        value["strategy"]["entryPrice"] = json!(1);
        value["strategy"]["takeProfit2"] = json!(null);

        let result = validate_analysis(&value).unwrap();
        let strategy = &result.strategy;
        assert_eq!(strategy.signal, Signal::Hold);
        for (_, price) in strategy.price_levels() {
            assert_eq!(price, result.current_price);
        }
    }

    #[test]
    fn unrecognized_signal_behaves_as_hold() {
        let mut value = sample_analysis();
        value["strategy"]["signal"] = json!("STRONG BUY");

        let result = validate_analysis(&value).unwrap();
        assert_eq!(result.strategy.signal, Signal::Hold);
        assert_eq!(result.strategy.entry_price, result.current_price);
    }

    #[test]
    fn unrecognized_sentiment_behaves_as_neutral() {
        let mut value = sample_analysis();
        value["marketSentiment"] = json!("Cautiously optimistic");
        let result = validate_analysis(&value).unwrap();
        assert_eq!(result.market_sentiment, MarketSentiment::Neutral);

        value.as_object_mut().unwrap().remove("marketSentiment");
        let result = validate_analysis(&value).unwrap();
        assert_eq!(result.market_sentiment, MarketSentiment::Neutral);
    }

    #[test]
    fn rsi_interpretation_derived_when_unrecognized() {
        let mut value = sample_analysis();
        value["rsi"] = json!({"value": 78.2, "interpretation": "Hot"});
        let result = validate_analysis(&value).unwrap();
        assert_eq!(result.rsi.interpretation, RsiInterpretation::Overbought);
    }

    #[test]
    fn rsi_and_confidence_are_clamped() {
        let mut value = sample_analysis();
        value["rsi"]["value"] = json!(130);
        value["strategy"]["confidence"] = json!(104.6);
        let result = validate_analysis(&value).unwrap();
        assert_eq!(result.rsi.value, dec!(100));
        assert_eq!(result.strategy.confidence, 100);

        value["strategy"]["confidence"] = json!("65.4");
        let result = validate_analysis(&value).unwrap();
        assert_eq!(result.strategy.confidence, 65);
    }

    #[test]
    fn missing_numbers_are_reported_by_path() {
        let mut value = sample_analysis();
        value.as_object_mut().unwrap().remove("currentPrice");
        value["pivotPoints"]["r2"] = json!("n/a");
        value["strategy"]["stopLoss"] = json!(null);

        let errors = validate_analysis(&value).unwrap_err();
        assert!(errors.contains_path("currentPrice"));
        assert!(errors.contains_path("pivotPoints.r2"));
        assert!(errors.contains_path("strategy.stopLoss"));
    }

    #[test]
    fn missing_objects_are_reported_once() {
        let mut value = sample_analysis();
        value.as_object_mut().unwrap().remove("pivotPoints");
        value["movingAverages"] = json!([1, 2]);

        let errors = validate_analysis(&value).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_path("pivotPoints"));
        assert!(errors.contains_path("movingAverages"));
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let mut value = sample_analysis();
        value["currentPrice"] = json!(0);
        let errors = validate_analysis(&value).unwrap_err();
        assert!(errors.contains_path("currentPrice"));
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let mut value = sample_analysis();
        value["currentPrice"] = json!("$3,341.25");
        value["movingAverages"]["ma50"] = json!("3325.4");
        let result = validate_analysis(&value).unwrap();
        assert_eq!(result.current_price, dec!(3341.25));
        assert_eq!(result.moving_averages.ma50, dec!(3325.4));
    }

    #[test]
    fn missing_history_is_empty_not_an_error() {
        let mut value = sample_analysis();
        value.as_object_mut().unwrap().remove("historicalData");
        assert!(validate_analysis(&value).unwrap().historical_data.is_empty());

        value["historicalData"] = json!(null);
        assert!(validate_analysis(&value).unwrap().historical_data.is_empty());
    }

    #[test]
    fn malformed_candles_are_skipped() {
        let mut value = sample_analysis();
        value["historicalData"] = json!([
            {"time": "2025-08-14T09:00:00Z", "open": 1, "high": 2, "low": 0.5, "close": 1.5},
            {"time": "yesterday", "open": 1, "high": 2, "low": 0.5, "close": 1.5},
            {"time": "2025-08-14T11:00:00", "open": 1, "high": 2, "low": 0.5},
            {"time": 1755169200, "open": 1, "high": 2, "low": 0.5, "close": 1.7}
        ]);
        let result = validate_analysis(&value).unwrap();
        assert_eq!(result.historical_data.len(), 2);
        assert_eq!(result.historical_data[1].close, dec!(1.7));
    }

    #[test]
    fn extreme_epoch_candle_times_are_skipped() {
        let bar = |time: Value| json!({"time": time, "open": 1, "high": 2, "low": 0.5, "close": 1.5});
        assert!(candle(&bar(json!(i64::MIN))).is_none());
        assert!(candle(&bar(json!(i64::MAX))).is_none());
        assert!(candle(&bar(json!(1_755_169_200_000_i64))).is_some());
    }

    #[test]
    fn news_summary_may_be_nested_in_strategy() {
        let mut value = sample_analysis();
        value.as_object_mut().unwrap().remove("newsSummary");
        value["strategy"]["newsSummary"] = json!("Nested summary.");
        let result = validate_analysis(&value).unwrap();
        assert_eq!(result.news_summary, "Nested summary.");
    }

    #[test]
    fn non_object_payload_is_invalid() {
        let errors = validate_analysis(&json!([1, 2])).unwrap_err();
        assert!(errors.contains_path("$"));
    }

    #[test]
    fn news_sorted_newest_first() {
        let json = r#"[
            {"title": "Old", "summary": "s", "sourceName": "Reuters", "sourceUrl": "https://r.com/1", "publishedDate": "2025-08-14T06:00:00Z"},
            {"title": "New", "summary": "s", "sourceName": "FXStreet", "sourceUrl": "https://f.com/2", "publishedDate": "2025-08-14T11:30:00Z"},
            {"title": "Undated", "summary": "s", "sourceName": "Kitco", "sourceUrl": "https://k.com/3", "publishedDate": "sometime"}
        ]"#;
        let articles = parse_news_articles(json).unwrap();
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old", "Undated"]);
        assert!(articles[2].published_date.is_none());
    }

    #[test]
    fn news_accepts_wrapped_and_empty_payloads() {
        let wrapped = r#"{"articles": [{"title": "A", "sourceUrl": "https://a.com"}]}"#;
        let articles = parse_news_articles(wrapped).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].summary, "");

        assert!(parse_news_articles("{}").unwrap().is_empty());
        assert!(parse_news_articles("[]").unwrap().is_empty());
        assert!(matches!(
            parse_news_articles("\"just a string\""),
            Err(AgentError::Invalid(_))
        ));
        assert!(matches!(
            parse_news_articles("[{\"title\": "),
            Err(AgentError::Parse(_))
        ));
    }

    #[test]
    fn news_without_title_or_url_is_dropped() {
        let json = r#"[
            {"title": "", "sourceUrl": "https://a.com"},
            {"title": "No link"},
            {"title": "Kept", "sourceUrl": "https://b.com"}
        ]"#;
        let articles = parse_news_articles(json).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Kept");
    }

    #[test]
    fn grounding_filter_drops_non_web_chunks() {
        let chunks = vec![
            GroundingChunk {
                web: Some(GroundingWeb {
                    uri: Some("u1".to_string()),
                    title: None,
                }),
            },
            GroundingChunk { web: None },
            GroundingChunk {
                web: Some(GroundingWeb {
                    uri: Some("u2".to_string()),
                    title: Some("T".to_string()),
                }),
            },
        ];

        let sources = sources_from_grounding(&chunks);
        assert_eq!(
            serde_json::to_value(&sources).unwrap(),
            json!([{"web": {"uri": "u1"}}, {"web": {"uri": "u2", "title": "T"}}])
        );
    }

    #[test]
    fn grounding_keeps_duplicates_in_order() {
        let chunk = |uri: &str| GroundingChunk {
            web: Some(GroundingWeb {
                uri: Some(uri.to_string()),
                title: None,
            }),
        };
        let empty_uri = GroundingChunk {
            web: Some(GroundingWeb {
                uri: Some(String::new()),
                title: Some("Blank".to_string()),
            }),
        };

        let sources = sources_from_grounding(&[chunk("a"), empty_uri, chunk("b"), chunk("a")]);
        let uris: Vec<&str> = sources.iter().filter_map(|s| s.uri()).collect();
        assert_eq!(uris, vec!["a", "b", "a"]);
    }

    #[test]
    fn timestamps_in_several_shapes() {
        let expected = Utc.with_ymd_and_hms(2025, 8, 14, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp(&json!("2025-08-14T10:00:00Z")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2025-08-14T12:00:00+02:00")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2025-08-14T10:00:00")), Some(expected));
        assert_eq!(parse_timestamp(&json!(expected.timestamp())), Some(expected));
        assert_eq!(
            parse_timestamp(&json!(expected.timestamp_millis())),
            Some(expected)
        );
        assert_eq!(parse_timestamp(&json!("last Tuesday")), None);
    }
}
