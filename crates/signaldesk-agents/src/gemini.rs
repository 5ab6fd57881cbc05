use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use signaldesk_models::{GroundingChunk, ModelConfig};
use tracing::{debug, warn};

use crate::error::AgentError;
use crate::model::{GenerationRequest, GenerationResponse, GenerativeModel};

/// Connection settings for the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Settings from the model config, with the key read from the environment
    /// variable it names. A blank variable counts as unset.
    pub fn from_model_config(config: &ModelConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            warn!(env = %config.api_key_env, "Gemini API key environment variable is not set");
        }
        Self {
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

/// Gemini `generateContent` client with optional Google Search grounding.
pub struct GeminiModel {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiModel {
    pub fn new(config: GeminiConfig) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, AgentError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AgentError::Configuration("Gemini API key is not set".to_string()))?;

        debug!(
            model = %self.config.model,
            web_search = request.web_search,
            temperature = request.temperature,
            prompt_len = request.prompt.len(),
            "Calling Gemini"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::Timeout(self.config.timeout.as_secs())
                } else {
                    AgentError::Transport(format!("Network error: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Gemini request failed");
            return Err(AgentError::Transport(format!(
                "HTTP {}: {}",
                status.as_u16(),
                api_error_message(&body)
            )));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Transport(format!("Unreadable Gemini response: {e}")))?;

        Ok(wire.into_generation_response())
    }
}

fn request_body(request: &GenerationRequest) -> Value {
    let mut body = json!({
        "contents": [{"role": "user", "parts": [{"text": request.prompt}]}],
        "generationConfig": {"temperature": request.temperature},
    });
    if request.web_search {
        body["tools"] = json!([{"google_search": {}}]);
    }
    body
}

/// The `error.message` of a Gemini error body, else the body itself.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireContent>,
    #[serde(default)]
    grounding_metadata: Option<WireGroundingMetadata>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Default, Deserialize)]
struct WirePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

impl WireResponse {
    /// Text parts of the first candidate joined together, plus its grounding
    /// chunks.
    fn into_generation_response(self) -> GenerationResponse {
        let Some(candidate) = self.candidates.into_iter().next() else {
            debug!("Gemini returned no candidates");
            return GenerationResponse::default();
        };

        if let Some(reason) = &candidate.finish_reason {
            debug!(finish_reason = %reason, "Gemini candidate finished");
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        GenerationResponse {
            text: (!text.is_empty()).then_some(text),
            grounding_chunks: candidate
                .grounding_metadata
                .map(|m| m.grounding_chunks)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> GeminiConfig {
        GeminiConfig {
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: api_key.map(str::to_string),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        let model = GeminiModel::new(config(None)).unwrap();
        let request = GenerationRequest {
            prompt: "hi".to_string(),
            web_search: true,
            temperature: 0.3,
        };
        let err = model.generate(&request).await.unwrap_err();
        assert!(matches!(err, AgentError::Configuration(_)));
    }

    #[test]
    fn endpoint_includes_model() {
        let model = GeminiModel::new(config(Some("k"))).unwrap();
        assert_eq!(
            model.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(model.name(), "gemini-2.5-flash");
    }

    #[test]
    fn body_enables_search_tool_only_when_requested() {
        let mut request = GenerationRequest {
            prompt: "analyze".to_string(),
            web_search: true,
            temperature: 0.1,
        };
        let body = request_body(&request);
        assert_eq!(body["tools"], json!([{"google_search": {}}]));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "analyze");
        assert!(body["generationConfig"]["temperature"].as_f64().unwrap() > 0.09);

        request.web_search = false;
        assert!(request_body(&request).get("tools").is_none());
    }

    #[test]
    fn response_text_and_grounding() {
        let wire: WireResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "```json\n{\"a\":"}, {"text": "1}\n```"}]},
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://a.com", "title": "a.com"}},
                        {"retrievedContext": {"uri": "gs://x"}}
                    ]
                }
            }]
        }))
        .unwrap();

        let response = wire.into_generation_response();
        assert_eq!(response.text.as_deref(), Some("```json\n{\"a\":1}\n```"));
        assert_eq!(response.grounding_chunks.len(), 2);
        assert!(response.grounding_chunks[1].web.is_none());
    }

    #[test]
    fn blocked_response_has_no_text() {
        let wire: WireResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}],
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        assert_eq!(wire.into_generation_response(), GenerationResponse::default());

        let empty: WireResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.into_generation_response().text.is_none());
    }

    #[test]
    fn error_message_prefers_api_error_field() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(api_error_message(body), "Quota exceeded");
        assert_eq!(api_error_message(" upstream down "), "upstream down");
    }
}
