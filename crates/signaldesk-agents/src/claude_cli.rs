use std::time::Duration;

use async_trait::async_trait;
use signaldesk_models::ModelConfig;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::AgentError;
use crate::model::{GenerationRequest, GenerationResponse, GenerativeModel};

/// Configuration for a Claude CLI invocation.
#[derive(Debug, Clone)]
pub struct ClaudeCliConfig {
    pub model: String,
    pub timeout: Duration,
}

impl Default for ClaudeCliConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-5-haiku-latest".to_string(),
            timeout: Duration::from_secs(90),
        }
    }
}

impl ClaudeCliConfig {
    pub fn from_model_config(config: &ModelConfig) -> Self {
        Self {
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

/// The child is killed if the returned future is dropped, so a timed-out
/// call does not leave `claude` running.
fn claude_command(prompt: &str, config: &ClaudeCliConfig) -> Command {
    let mut command = Command::new("claude");
    command
        .args([
            "-p",
            prompt,
            "--model",
            &config.model,
            "--output-format",
            "text",
        ])
        .kill_on_drop(true);
    command
}

/// Invoke the `claude` CLI with a single prompt.
/// Returns the raw stdout text.
pub async fn invoke_claude(prompt: &str, config: &ClaudeCliConfig) -> Result<String, AgentError> {
    debug!(model = %config.model, prompt_len = prompt.len(), "Invoking claude CLI");

    let mut command = claude_command(prompt, config);
    let result = tokio::time::timeout(config.timeout, command.output())
        .await
        .map_err(|_| AgentError::Timeout(config.timeout.as_secs()))?
        .map_err(|e| AgentError::Transport(format!("Failed to spawn claude: {e}")))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        warn!(status = %result.status, stderr = %stderr, "Claude CLI failed");
        return Err(AgentError::Transport(format!(
            "claude exited {}: {}",
            result.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&result.stdout).to_string())
}

/// Check if the `claude` CLI is available on the system.
pub async fn check_cli_available() -> bool {
    match Command::new("claude").arg("--version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

/// A generative model backed by the local `claude` CLI. The CLI does its own
/// tool use, so the web-search flag and temperature are not forwarded, and no
/// grounding chunks come back.
pub struct ClaudeCliModel {
    config: ClaudeCliConfig,
}

impl ClaudeCliModel {
    pub fn new(config: ClaudeCliConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl GenerativeModel for ClaudeCliModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, AgentError> {
        let stdout = invoke_claude(&request.prompt, &self.config).await?;
        let text = (!stdout.trim().is_empty()).then_some(stdout);
        Ok(GenerationResponse {
            text,
            grounding_chunks: Vec::new(),
        })
    }
}
