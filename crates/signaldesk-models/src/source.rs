use serde::{Deserialize, Serialize};

/// A grounding reference the model consulted. Only web references are kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebSource {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Source {
    pub fn web(uri: impl Into<String>, title: Option<String>) -> Self {
        Self {
            web: Some(WebSource {
                uri: uri.into(),
                title,
            }),
        }
    }

    /// The web uri, if this source has a non-empty one.
    pub fn uri(&self) -> Option<&str> {
        self.web
            .as_ref()
            .map(|w| w.uri.as_str())
            .filter(|u| !u.is_empty())
    }

    pub fn title(&self) -> Option<&str> {
        self.web
            .as_ref()
            .and_then(|w| w.title.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

/// A grounding chunk as reported by the model provider. Chunks without a web
/// reference (retrieved documents, maps results) are discarded downstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<GroundingWeb>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GroundingWeb {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}
