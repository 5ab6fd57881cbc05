use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    EmptyResponse(String),

    #[error("Model response parse error: {0}")]
    Parse(String),

    #[error("Model response failed validation: {0}")]
    Invalid(FieldErrors),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Model call timed out after {0} seconds")]
    Timeout(u64),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Store error: {0}")]
    Store(#[from] signaldesk_store::StoreError),
}

/// Which user action an error interrupted. Selects the wording of
/// `AgentError::user_message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Analysis,
    News,
}

impl AgentError {
    /// The single message shown to the user at the page boundary.
    pub fn user_message(&self, operation: Operation) -> String {
        match (self, operation) {
            (Self::Configuration(_), _) => "Gemini API key is not configured.".to_string(),
            (Self::EmptyResponse(message), _) => message.clone(),
            (Self::InvalidRequest(message), _) => message.clone(),
            (Self::Parse(_), Operation::Analysis) => {
                "Failed to parse AI response as JSON. Please try again.".to_string()
            }
            (Self::Parse(_), Operation::News) => {
                "Failed to parse AI response for news as JSON. Please try again.".to_string()
            }
            (Self::Invalid(errors), Operation::Analysis) => format!(
                "The AI response was incomplete ({errors}). Please try again."
            ),
            (Self::Invalid(errors), Operation::News) => format!(
                "The AI news response was incomplete ({errors}). Please try again."
            ),
            (other, Operation::Analysis) => {
                format!("Failed to get analysis from AI: {}", other.cause())
            }
            (other, Operation::News) => format!("Failed to get news from AI: {}", other.cause()),
        }
    }

    fn cause(&self) -> String {
        match self {
            Self::Transport(cause) => cause.clone(),
            other => other.to_string(),
        }
    }
}

/// One schema problem in a model response, addressed by JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub problem: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            problem: problem.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.problem)
    }
}

/// Every schema problem found in one response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, path: impl Into<String>, problem: impl Into<String>) {
        self.0.push(FieldError::new(path, problem));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.0.iter().any(|e| e.path == path)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        f.write_str(&parts.join("; "))
    }
}
