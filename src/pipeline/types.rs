use serde::Serialize;
use std::fmt;

/// Status tag for the most recently completed (or failed) stage. The rendered
/// text is the externally surfaced signal; error variants carry the provider
/// message verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepTag {
    Initialized,
    QueryProcessed,
    QueryError(String),
    SearchCompleted,
    SearchError(String),
    AnswerGenerated,
    AnswerError(String),
    WorkflowError(String),
}

impl StepTag {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            StepTag::QueryError(_)
                | StepTag::SearchError(_)
                | StepTag::AnswerError(_)
                | StepTag::WorkflowError(_)
        )
    }
}

impl fmt::Display for StepTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepTag::Initialized => f.write_str("initialized"),
            StepTag::QueryProcessed => f.write_str("query_processed"),
            StepTag::QueryError(msg) => write!(f, "query_error: {msg}"),
            StepTag::SearchCompleted => f.write_str("search_completed"),
            StepTag::SearchError(msg) => write!(f, "search_error: {msg}"),
            StepTag::AnswerGenerated => f.write_str("answer_generated"),
            StepTag::AnswerError(msg) => write!(f, "answer_error: {msg}"),
            StepTag::WorkflowError(msg) => write!(f, "workflow_error: {msg}"),
        }
    }
}

/// The mutable record threaded through one run. Fields populate monotonically
/// left to right; `current_step` always reflects the most recent stage.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub original_question: String,
    pub search_query: String,
    pub search_results: String,
    pub final_answer: String,
    pub current_step: StepTag,
}

impl PipelineState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            original_question: question.into(),
            search_query: String::new(),
            search_results: String::new(),
            final_answer: String::new(),
            current_step: StepTag::Initialized,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub search_query: String,
    pub current_step: String,
    pub success: bool,
}

/// Result of the tolerant entry point.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub content: String,
    pub metadata: RunMetadata,
}

pub const STEP_BY_STEP: &str = "step_by_step";

#[derive(Debug, Clone, Serialize)]
pub struct StepMetadata {
    pub search_query: String,
    pub search_results_length: usize,
    pub processing_method: &'static str,
    pub success: bool,
    pub error: Option<String>,
}

/// Result of the strict step-by-step entry point.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub content: String,
    pub metadata: StepMetadata,
}

/// Static description of the workflow graph.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowInfo {
    pub nodes: [&'static str; 3],
    pub entry_point: &'static str,
    pub provider: String,
    pub model: String,
    pub backend: String,
    pub status: &'static str,
}
