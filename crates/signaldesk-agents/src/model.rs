use async_trait::async_trait;
use signaldesk_models::GroundingChunk;

use crate::error::AgentError;

/// One call to a generative model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Let the model ground its answer in live web search results.
    pub web_search: bool,
    pub temperature: f32,
}

/// Raw model output, before any extraction or validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResponse {
    /// `None` when the model produced no text at all (e.g. a safety block).
    pub text: Option<String>,
    pub grounding_chunks: Vec<GroundingChunk>,
}

impl GenerationResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            grounding_chunks: Vec::new(),
        }
    }

    /// The text, if there is any that is not whitespace.
    pub fn non_blank_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Trait for text generation backends. Mockable for testing.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_counts_as_missing() {
        assert_eq!(GenerationResponse::default().non_blank_text(), None);
        assert_eq!(GenerationResponse::text("  \n").non_blank_text(), None);
        assert_eq!(GenerationResponse::text("{}").non_blank_text(), Some("{}"));
    }
}
