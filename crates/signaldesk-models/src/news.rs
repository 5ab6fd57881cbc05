use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A financial news article surfaced by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    /// One or two sentences.
    pub summary: String,
    pub source_name: String,
    pub source_url: String,
    /// None when the model returned a date that could not be parsed.
    pub published_date: Option<DateTime<Utc>>,
}

/// Order articles newest first. Undated articles keep their relative order
/// and go last.
pub fn sort_newest_first(articles: &mut [NewsArticle]) {
    articles.sort_by(|a, b| match (a.published_date, b.published_date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
