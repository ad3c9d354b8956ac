use std::sync::Arc;

use serde_json::json;

pub mod logging;
pub mod types;

use crate::agents::{QueryRewriter, Summarizer};
use crate::errors::WorkflowError;
use crate::providers::CompletionProvider;
use crate::search::SearchClient;
use self::logging::PipelineLogger;
use self::types::{
    PipelineState, RunMetadata, RunOutcome, STEP_BY_STEP, StepMetadata, StepOutcome, StepTag,
    WorkflowInfo,
};

/// Fixed three-node workflow: rewrite -> search -> summarize.
///
/// Owns its components; holds no mutable state between runs, so one instance
/// can serve any number of sequential questions.
pub struct SearchWorkflow {
    rewriter: QueryRewriter,
    summarizer: Summarizer,
    search: SearchClient,
    provider_name: String,
    model: String,
    trace: Option<PipelineLogger>,
}

impl SearchWorkflow {
    pub fn new(provider: Arc<dyn CompletionProvider>, search: SearchClient) -> Self {
        let provider_name = provider.name().to_string();
        let model = provider.model().to_string();

        Self {
            rewriter: QueryRewriter::new(provider.clone()),
            summarizer: Summarizer::new(provider),
            search,
            provider_name,
            model,
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: PipelineLogger) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Tolerant entry point: a stage failure is absorbed into the state
    /// record and the run continues with degraded input. Only a failure
    /// outside the stage calls aborts the run.
    pub async fn run(&self, question: &str) -> RunOutcome {
        match self.run_stages(question).await {
            Ok(state) => finish(state),
            Err(e) => workflow_failure(&e.to_string()),
        }
    }

    async fn run_stages(&self, question: &str) -> Result<PipelineState, WorkflowError> {
        let mut state = PipelineState::new(question);
        self.trace_transition(&state)?;

        // Stage 1: rewrite. On failure the original question doubles as the query.
        let rewrite = self.rewriter.rewrite(&state.original_question).await;
        match rewrite.error {
            None => {
                state.search_query = rewrite.text;
                state.current_step = StepTag::QueryProcessed;
                log::debug!("generated search query: {}", state.search_query);
            }
            Some(message) => {
                log::warn!("query rewrite failed: {message}");
                state.search_query = state.original_question.clone();
                state.current_step = StepTag::QueryError(message);
            }
        }
        self.trace_transition(&state)?;

        // Stage 2: search. On failure a literal takes the place of results.
        let search = self.search.search(&state.search_query).await;
        match search.error {
            None => {
                state.search_results = search.text;
                state.current_step = StepTag::SearchCompleted;
                log::debug!(
                    "retrieved search results ({} chars)",
                    state.search_results.len()
                );
            }
            Some(message) => {
                log::warn!("search failed: {message}");
                state.search_results = format!("Search failed: {message}");
                state.current_step = StepTag::SearchError(message);
            }
        }
        self.trace_transition(&state)?;

        // Stage 3: summarize. Runs even over a failure literal from stage 2.
        let answer = self
            .summarizer
            .summarize(&state.search_results, &state.original_question)
            .await;
        match answer.error {
            None => {
                state.final_answer = answer.text;
                state.current_step = StepTag::AnswerGenerated;
                log::debug!("generated final answer ({} chars)", state.final_answer.len());
            }
            Some(message) => {
                log::warn!("answer generation failed: {message}");
                state.final_answer = format!("Answer generation failed: {message}");
                state.current_step = StepTag::AnswerError(message);
            }
        }
        self.trace_transition(&state)?;

        Ok(state)
    }

    /// Strict diagnostic entry point: identical stage semantics, but the run
    /// aborts on the first stage failure instead of degrading.
    pub async fn run_step_by_step(&self, question: &str) -> StepOutcome {
        let rewrite = self.rewriter.rewrite(question).await;
        if let Some(message) = rewrite.error {
            return step_failure(message);
        }
        let search_query = rewrite.text;

        let search = self.search.search(&search_query).await;
        if let Some(message) = search.error {
            return step_failure(message);
        }
        let search_results = search.text;

        let answer = self.summarizer.summarize(&search_results, question).await;
        if let Some(message) = answer.error {
            return step_failure(message);
        }

        StepOutcome {
            content: answer.text,
            metadata: StepMetadata {
                search_query,
                search_results_length: search_results.len(),
                processing_method: STEP_BY_STEP,
                success: true,
                error: None,
            },
        }
    }

    pub fn status(&self) -> WorkflowInfo {
        WorkflowInfo {
            nodes: ["query_processing", "web_search", "answer_generation"],
            entry_point: "query_processing",
            provider: self.provider_name.clone(),
            model: self.model.clone(),
            backend: self.search.backend_name().to_string(),
            status: "ready",
        }
    }

    fn trace_transition(&self, state: &PipelineState) -> Result<(), WorkflowError> {
        let Some(trace) = &self.trace else {
            return Ok(());
        };
        trace.log_transition(
            &state.current_step.to_string(),
            json!({
                "search_query": state.search_query,
                "results_chars": state.search_results.len(),
                "answer_chars": state.final_answer.len(),
            }),
        )?;
        Ok(())
    }
}

fn finish(state: PipelineState) -> RunOutcome {
    let current_step = state.current_step.to_string();
    // The external success signal is a textual check on the rendered tag,
    // which embeds provider messages verbatim.
    let success = !current_step.contains("error");

    RunOutcome {
        content: state.final_answer,
        metadata: RunMetadata {
            search_query: state.search_query,
            current_step,
            success,
        },
    }
}

fn workflow_failure(message: &str) -> RunOutcome {
    RunOutcome {
        content: format!("Workflow failed: {message}"),
        metadata: RunMetadata {
            search_query: String::new(),
            current_step: StepTag::WorkflowError(message.to_string()).to_string(),
            success: false,
        },
    }
}

fn step_failure(message: String) -> StepOutcome {
    StepOutcome {
        content: format!("Processing failed: {message}"),
        metadata: StepMetadata {
            search_query: String::new(),
            search_results_length: 0,
            processing_method: STEP_BY_STEP,
            success: false,
            error: Some(message),
        },
    }
}
