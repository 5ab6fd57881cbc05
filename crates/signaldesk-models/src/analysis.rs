use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// RSI at or above this level reads as overbought.
pub const RSI_OVERBOUGHT: Decimal = Decimal::from_parts(70, 0, 0, false, 0);
/// RSI at or below this level reads as oversold.
pub const RSI_OVERSOLD: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// A complete AI-produced analysis for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub ticker: String,
    pub current_price: Decimal,
    pub pivot_points: PivotPoints,
    pub rsi: Rsi,
    pub moving_averages: MovingAverages,
    pub strategy: Strategy,
    pub market_sentiment: MarketSentiment,
    pub news_summary: String,
    /// Oldest first, as returned by the model.
    pub historical_data: Vec<Candle>,
}

/// Classic floor-trader pivot levels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PivotPoints {
    pub s3: Decimal,
    pub s2: Decimal,
    pub s1: Decimal,
    pub pp: Decimal,
    pub r1: Decimal,
    pub r2: Decimal,
    pub r3: Decimal,
}

impl PivotPoints {
    /// Levels from lowest support to highest resistance.
    pub fn levels(&self) -> [(&'static str, Decimal); 7] {
        [
            ("S3", self.s3),
            ("S2", self.s2),
            ("S1", self.s1),
            ("PP", self.pp),
            ("R1", self.r1),
            ("R2", self.r2),
            ("R3", self.r3),
        ]
    }

    /// Whether s3 < s2 < s1 < pp < r1 < r2 < r3. The model is asked for this
    /// ordering but nothing guarantees it.
    pub fn is_ordered(&self) -> bool {
        self.levels().windows(2).all(|w| w[0].1 < w[1].1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rsi {
    /// 0 to 100.
    pub value: Decimal,
    pub interpretation: RsiInterpretation,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RsiInterpretation {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiInterpretation {
    /// Case-insensitive match against the labels the model is asked to use.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "overbought" => Some(Self::Overbought),
            "oversold" => Some(Self::Oversold),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    /// Interpretation implied by an RSI reading.
    pub fn from_value(value: Decimal) -> Self {
        if value >= RSI_OVERBOUGHT {
            Self::Overbought
        } else if value <= RSI_OVERSOLD {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovingAverages {
    pub ma50: Decimal,
    pub ma200: Decimal,
}

/// The trade plan attached to an analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub signal: Signal,
    pub description: String,
    pub entry_price: Decimal,
    pub stop_loss: Decimal,
    pub take_profit1: Decimal,
    pub take_profit2: Decimal,
    /// 0 to 100.
    pub confidence: u8,
    pub analysis_description: String,
    pub risk_tip: String,
}

impl Strategy {
    /// The four price levels in display order: entry, TP1, TP2, SL.
    pub fn price_levels(&self) -> [(&'static str, Decimal); 4] {
        [
            ("Entry", self.entry_price),
            ("TP1", self.take_profit1),
            ("TP2", self.take_profit2),
            ("SL", self.stop_loss),
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Signal {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "BUY" => Some(Self::Buy),
            "SELL" => Some(Self::Sell),
            "HOLD" => Some(Self::Hold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MarketSentiment {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl MarketSentiment {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "bullish" => Some(Self::Bullish),
            "bearish" => Some(Self::Bearish),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for MarketSentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One OHLC bar of the model-supplied price history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_pivots() -> PivotPoints {
        PivotPoints {
            s3: dec!(3280),
            s2: dec!(3290),
            s1: dec!(3300),
            pp: dec!(3314),
            r1: dec!(3331),
            r2: dec!(3350),
            r3: dec!(3361),
        }
    }

    #[test]
    fn pivot_ordering() {
        let mut pivots = sample_pivots();
        assert!(pivots.is_ordered());

        pivots.r1 = dec!(3300);
        assert!(!pivots.is_ordered());
    }

    #[test]
    fn rsi_interpretation_from_value() {
        assert_eq!(RsiInterpretation::from_value(dec!(70)), RsiInterpretation::Overbought);
        assert_eq!(RsiInterpretation::from_value(dec!(82.4)), RsiInterpretation::Overbought);
        assert_eq!(RsiInterpretation::from_value(dec!(30)), RsiInterpretation::Oversold);
        assert_eq!(RsiInterpretation::from_value(dec!(51.2)), RsiInterpretation::Neutral);
    }

    #[test]
    fn enum_labels_are_case_insensitive() {
        assert_eq!(Signal::from_label(" buy "), Some(Signal::Buy));
        assert_eq!(Signal::from_label("Strong Buy"), None);
        assert_eq!(MarketSentiment::from_label("BEARISH"), Some(MarketSentiment::Bearish));
        assert_eq!(
            RsiInterpretation::from_label("oversold"),
            Some(RsiInterpretation::Oversold)
        );
    }

    #[test]
    fn signal_serialization() {
        assert_eq!(serde_json::to_string(&Signal::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&Signal::Hold).unwrap(), "\"HOLD\"");
        assert_eq!(
            serde_json::to_string(&MarketSentiment::Bullish).unwrap(),
            "\"Bullish\""
        );
    }
}
