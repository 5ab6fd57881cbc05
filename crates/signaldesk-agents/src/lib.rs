pub mod citation;
pub mod claude_cli;
pub mod error;
pub mod gemini;
pub mod model;
pub mod page;
pub mod parser;
pub mod prompts;
pub mod service;
pub mod validate;

pub mod test_support;

pub use citation::{render_narrative, source_display_title, CitationKind, RenderedNarrative, Segment};
pub use claude_cli::{ClaudeCliConfig, ClaudeCliModel};
pub use error::{AgentError, FieldError, FieldErrors, Operation};
pub use gemini::{GeminiConfig, GeminiModel};
pub use model::{GenerationRequest, GenerationResponse, GenerativeModel};
pub use page::{AnalysisPage, AnalysisView, NewsPage, PageState, RequestTicket};
pub use parser::extract_json;
pub use prompts::{build_analysis_prompt, build_news_prompt};
pub use service::SignalService;
pub use validate::{parse_analysis, parse_news_articles, sources_from_grounding};
