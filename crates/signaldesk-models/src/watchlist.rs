use serde::{Deserialize, Serialize};

/// Symbols seeded into a fresh watchlist.
pub const DEFAULT_WATCHLIST: [&str; 4] = ["XAUUSD", "BTCUSD", "EURUSD", "DJI"];

/// Where `Watchlist::add` places a new symbol.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    #[default]
    Prepend,
    Append,
}

/// Insertion-ordered set of ticker symbols.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Watchlist {
    symbols: Vec<String>,
}

impl Default for Watchlist {
    fn default() -> Self {
        Self::from(DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }
}

impl From<Vec<String>> for Watchlist {
    fn from(symbols: Vec<String>) -> Self {
        let symbols = symbols
            .iter()
            .map(|s| normalize(s))
            .filter(|s| !s.is_empty())
            .collect();
        let mut list = Self { symbols };
        list.dedup();
        list
    }
}

impl From<Watchlist> for Vec<String> {
    fn from(list: Watchlist) -> Self {
        list.symbols
    }
}

impl Watchlist {
    pub fn empty() -> Self {
        Self {
            symbols: Vec::new(),
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        let symbol = normalize(symbol);
        self.symbols.iter().any(|s| *s == symbol)
    }

    /// Add a symbol. Returns false when it was blank or already present, in
    /// which case the list is unchanged.
    pub fn add(&mut self, symbol: &str, position: InsertPosition) -> bool {
        let symbol = normalize(symbol);
        if symbol.is_empty() || self.symbols.contains(&symbol) {
            return false;
        }
        match position {
            InsertPosition::Prepend => self.symbols.insert(0, symbol),
            InsertPosition::Append => self.symbols.push(symbol),
        }
        self.dedup();
        true
    }

    /// Returns false when the symbol was not on the list.
    pub fn remove(&mut self, symbol: &str) -> bool {
        let symbol = normalize(symbol);
        let before = self.symbols.len();
        self.symbols.retain(|s| *s != symbol);
        self.dedup();
        self.symbols.len() != before
    }

    /// Drop repeats, keeping the first occurrence.
    fn dedup(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.symbols.retain(|s| seen.insert(s.clone()));
    }
}

fn normalize(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}
