/// The SQLite table backing the key-value store.
///
/// ```sql
/// CREATE TABLE IF NOT EXISTS kv_entries (
///     key         TEXT PRIMARY KEY,
///     value_json  TEXT NOT NULL,
///     updated_at  TEXT NOT NULL
/// );
/// ```
pub const KV_TABLE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS kv_entries (
    key         TEXT PRIMARY KEY,
    value_json  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
";

/// Key holding the JSON array of history items, newest first.
pub const HISTORY_KEY: &str = "signalHistory";

/// Key holding the JSON array of watched symbols.
pub const WATCHLIST_KEY: &str = "signalWatchlist";

/// A raw row as stored in SQLite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvRow {
    pub key: String,
    pub value_json: String,
    pub updated_at: String,
}
