/// Publications the model is told to prefer, in the order they are listed.
pub const PREFERRED_SOURCES: &[&str] = &[
    "Actionforex.com",
    "Ainvest.com",
    "Altindex.com",
    "Arabictrader.com",
    "AXA-IM.co.uk",
    "BankOfEngland.co.uk",
    "Barchart.com",
    "BEA.gov",
    "Binance.com",
    "Bitbo.io",
    "Blockonomi",
    "Blockworks.co",
    "BNA.bh",
    "Businesstoday.com.my",
    "Chinadailyasia.com",
    "Coinbase.com",
    "Coincodex.com",
    "Coingecko.com",
    "Coinmarketcap.com",
    "Commbank.com.au",
    "Crypto.news",
    "Cryptodnes.bg",
    "Dailyforex.com",
    "Dbs.com.hk",
    "Deutschewealth.com",
    "Discoveryalert.com.au",
    "Economic Times",
    "Efginternational.com",
    "Europa.eu",
    "Financefeeds.com",
    "FlyEptPortugal.com",
    "Forex.com",
    "Fortrade.com",
    "Fxempire.com",
    "FXLeaders.com",
    "FXStreet.com",
    "Fxview.com",
    "Gainesvillecoins.com",
    "GlobalBankingAndFinance.com",
    "Gold.org",
    "Growbeansprout.com",
    "Hkeconomy.gov.hk",
    "Holder.io",
    "Investing.com",
    "Investtech.com",
    "Investx.com",
    "Jpmorgan.com",
    "Kagels-trading.com",
    "Kraken.com",
    "Kucoin.com",
    "Litefinance.org",
    "Livemint.com",
    "Marketpulse.com",
    "Marketscreener.com",
    "Mitrade.com",
    "Nasdaq.com",
    "Noortrends.ae",
    "Nordea.com",
    "Oanda.com",
    "ONS.gov.uk",
    "Oppenheimer",
    "Parliament.uk",
    "RBA.gov.au",
    "Saxo Bank",
    "Scmp.com",
    "Seeking Alpha",
    "SEIC.com",
    "Serrarigroup.com",
    "Sky.com",
    "Spglobal.com",
    "Ssga.com",
    "Thearmchairtrader.com",
    "Theblock.co",
    "Thecurrencyanalytics.com",
    "TipRanks.com",
    "Tradestation.com",
    "TradingEconomics.com",
    "Tradingview.com",
    "Usgoldbureau.com",
    "Vanguard.com",
];

/// Recency rule shared by every prompt.
pub const RECENCY_RULE: &str = "All information, news, and data points used MUST be from the \
    last 12 hours. Do not use older information.";

fn preferred_sources() -> String {
    PREFERRED_SOURCES.join(", ")
}

/// JSON shape the analysis prompt asks for.
fn analysis_schema() -> &'static str {
    r#"{
  "ticker": "string",
  "currentPrice": number,
  "pivotPoints": { "s3": number, "s2": number, "s1": number, "pp": number, "r1": number, "r2": number, "r3": number },
  "rsi": { "value": number, "interpretation": "'Overbought' | 'Oversold' | 'Neutral'" },
  "movingAverages": { "ma50": number, "ma200": number },
  "strategy": {
    "signal": "'BUY' | 'SELL' | 'HOLD'",
    "description": "A concise, one-sentence summary of the trading signal and its primary justification.",
    "entryPrice": number,
    "stopLoss": number,
    "takeProfit1": number,
    "takeProfit2": number,
    "confidence": number,
    "analysisDescription": "A detailed, multi-paragraph analysis of the asset's current market position. Combine technical, fundamental, and geopolitical factors. Identify key support and resistance levels.",
    "riskTip": "A concise, actionable paragraph outlining the primary risks of trading this asset now, upcoming events that could cause volatility, and practical risk management advice."
  },
  "marketSentiment": "'Bullish' | 'Bearish' | 'Neutral'",
  "newsSummary": "A concise, one-paragraph summary of recent news influencing the asset's price and sentiment.",
  "historicalData": [
    { "time": "YYYY-MM-DDTHH:mm:ssZ", "open": number, "high": number, "low": number, "close": number }
  ]
}"#
}

/// JSON shape of one article in the news prompt.
fn news_schema() -> &'static str {
    r#"{
  "title": "string // The full, original headline of the article.",
  "summary": "string // A concise, one or two-sentence summary of the article's key points.",
  "sourceName": "string // The name of the publication (e.g., 'Investing.com', 'Reuters').",
  "sourceUrl": "string // The full, direct URL to the original article.",
  "publishedDate": "string // The publication date and time in ISO 8601 format (e.g., '2023-10-27T10:00:00Z')."
}"#
}

/// Short narrative sample showing the expected citation density.
fn narrative_example() -> &'static str {
    "For \"analysisDescription\": \"Gold (XAU/USD) is under pressure as the US Dollar (DXY) \
     trades around the 98.30-98.40 mark[1]. Markets price an 83-86% probability[2] of a \
     25-basis-point rate cut, while a hotter-than-expected Producer Price Index[3] adds \
     uncertainty. Key support sits near $3314 and $3307[4], with resistance at $3331 and \
     $3350[4,5].\"\n\
     For \"riskTip\": \"With a large share of retail traders net-long[6], a sentiment shift could \
     trigger a sharp correction. Use predefined stop-loss levels and conservative sizing.\""
}

/// Build the analysis prompt for `symbol`. Deterministic: the same symbol
/// always yields the same text.
pub fn build_analysis_prompt(symbol: &str) -> String {
    let symbol = symbol.trim().to_uppercase();
    format!(
        "Act as a senior quantitative financial analyst. Your primary tool is web search. \
         For the financial instrument with the symbol '{symbol}', provide a technical \
         analysis, a market sentiment summary, and a detailed narrative strategy.\n\n\
         ## CRITICAL INSTRUCTIONS\n\n\
         1. Data Recency: {recency}\n\
         2. Prioritized Sources: You MUST prioritize the following reputable financial \
         websites for analysis, sentiment, and news. If a significant event is not covered \
         by them you may use other major outlets, but preference must always go to this \
         list: {sources}.\n\
         3. JSON Output Only: Respond with a single, valid JSON object matching the structure \
         below. Do not include any other text, explanations, or markdown formatting.\n\
         4. Verifiable Citations: Within \"analysisDescription\" and \"riskTip\", add inline \
         citations in the format [1], [2] or [1,2] immediately after any numerical data, \
         statistic, price, percentage, or key factual claim. Each number is the 1-based \
         position of the supporting source in your search results.\n\
         5. HOLD Rule: If the signal is HOLD, set \"entryPrice\", \"stopLoss\", \
         \"takeProfit1\" and \"takeProfit2\" all equal to \"currentPrice\".\n\
         6. \"confidence\" is an integer from 0 to 100.\n\n\
         ## JSON STRUCTURE\n\n\
         {schema}\n\n\
         Provide the last 5 days of historical data at a 1-hour timeframe.\n\n\
         ## EXAMPLE OF HIGH-QUALITY NARRATIVE\n\n\
         {example}\n\n\
         Now generate the full JSON object for '{symbol}' from real, up-to-date data, \
         following every rule above.",
        recency = RECENCY_RULE,
        sources = preferred_sources(),
        schema = analysis_schema(),
        example = narrative_example(),
    )
}

/// Build the news digest prompt.
pub fn build_news_prompt() -> String {
    format!(
        "Act as a financial news editor. Using web search, find the top 15 most significant \
         global financial news articles. Focus on major indices (S&P 500, Nasdaq), forex \
         (EUR/USD, USD/JPY), commodities (Gold, Oil), and cryptocurrencies (Bitcoin, \
         Ethereum).\n\n\
         Data Recency: {recency}\n\n\
         You MUST prioritize news from the following reputable financial websites. If a \
         significant event is not covered by them you may use other major outlets, but \
         preference must always go to this list: {sources}.\n\n\
         Your response MUST be a single, valid JSON array of news articles. Do not include \
         any other text, explanations, or markdown formatting.\n\n\
         Each article object must adhere to this structure:\n\
         {schema}\n\n\
         Ensure the URLs are valid and the summaries are neutral and informative.",
        recency = RECENCY_RULE,
        sources = preferred_sources(),
        schema = news_schema(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_prompt_is_deterministic() {
        assert_eq!(build_analysis_prompt("XAUUSD"), build_analysis_prompt("XAUUSD"));
    }

    #[test]
    fn analysis_prompt_uppercases_symbol() {
        let prompt = build_analysis_prompt(" btcusd ");
        assert!(prompt.contains("'BTCUSD'"));
        assert!(!prompt.contains("btcusd"));
    }

    #[test]
    fn analysis_prompt_contains_schema_keys() {
        let prompt = build_analysis_prompt("EURUSD");
        for key in [
            "\"ticker\"",
            "\"currentPrice\"",
            "\"pivotPoints\"",
            "\"rsi\"",
            "\"movingAverages\"",
            "\"strategy\"",
            "\"signal\"",
            "\"entryPrice\"",
            "\"stopLoss\"",
            "\"takeProfit1\"",
            "\"takeProfit2\"",
            "\"confidence\"",
            "\"analysisDescription\"",
            "\"riskTip\"",
            "\"marketSentiment\"",
            "\"newsSummary\"",
            "\"historicalData\"",
        ] {
            assert!(prompt.contains(key), "missing {key}");
        }
    }

    #[test]
    fn analysis_prompt_lists_enum_values() {
        let prompt = build_analysis_prompt("DJI");
        assert!(prompt.contains("'BUY' | 'SELL' | 'HOLD'"));
        assert!(prompt.contains("'Bullish' | 'Bearish' | 'Neutral'"));
        assert!(prompt.contains("'Overbought' | 'Oversold' | 'Neutral'"));
    }

    #[test]
    fn analysis_prompt_has_rules() {
        let prompt = build_analysis_prompt("DJI");
        assert!(prompt.contains(RECENCY_RULE));
        assert!(prompt.contains("MUST be from the last 12 hours"));
        assert!(prompt.contains("If the signal is HOLD"));
        assert!(prompt.contains("[1], [2]"));
        assert!(prompt.contains("Investing.com, Investtech.com"));
        assert!(PREFERRED_SOURCES.iter().all(|s| prompt.contains(s)));
    }

    #[test]
    fn news_prompt_has_rules_and_schema() {
        let prompt = build_news_prompt();
        assert_eq!(prompt, build_news_prompt());
        assert!(prompt.contains(RECENCY_RULE));
        assert!(prompt.contains("top 15"));
        for key in ["\"title\"", "\"summary\"", "\"sourceName\"", "\"sourceUrl\"", "\"publishedDate\""] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(PREFERRED_SOURCES.iter().all(|s| prompt.contains(s)));
    }
}
