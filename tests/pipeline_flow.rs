use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use askrs::errors::{ProviderError, SearchError};
use askrs::pipeline::SearchWorkflow;
use askrs::pipeline::logging::PipelineLogger;
use askrs::providers::{CompletionProvider, CompletionRequest};
use askrs::search::{RawResult, SearchBackend, SearchClient, SearchResponse};
use askrs::types::ModelId;

/// Replies in call order: first the rewrite stage, then the summarize stage.
struct ScriptedProvider {
    model: ModelId,
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            model: ModelId::new("scripted"),
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, req: &CompletionRequest) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(req.prompt.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ProviderError::Api(message)),
            None => Ok("default reply".to_string()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &ModelId {
        &self.model
    }

    fn validate_config(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

struct StubBackend {
    response: Option<SearchResponse>,
    failure: Option<String>,
}

impl StubBackend {
    fn with_results(titles: &[&str]) -> Box<Self> {
        Box::new(Self {
            response: Some(SearchResponse {
                organic_results: Some(
                    titles
                        .iter()
                        .map(|t| RawResult {
                            title: Some(t.to_string()),
                            snippet: Some(format!("about {t}")),
                            link: Some(format!("https://example.com/{t}")),
                        })
                        .collect(),
                ),
            }),
            failure: None,
        })
    }

    fn failing(message: &str) -> Box<Self> {
        Box::new(Self {
            response: None,
            failure: Some(message.to_string()),
        })
    }
}

#[async_trait::async_trait]
impl SearchBackend for StubBackend {
    async fn fetch(&self, _query: &str) -> Result<SearchResponse, SearchError> {
        if let Some(message) = &self.failure {
            return Err(SearchError::Api(message.clone()));
        }
        Ok(self.response.clone().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

const TAG_VOCABULARY: [&str; 8] = [
    "initialized",
    "query_processed",
    "query_error",
    "search_completed",
    "search_error",
    "answer_generated",
    "answer_error",
    "workflow_error",
];

fn tag_in_vocabulary(tag: &str) -> bool {
    TAG_VOCABULARY
        .iter()
        .any(|known| tag == *known || tag.starts_with(&format!("{known}: ")))
}

#[tokio::test]
async fn tolerant_run_happy_path() {
    let provider = ScriptedProvider::new(vec![
        Ok("latest rust release".to_string()),
        Ok("Rust 1.88 shipped in June.".to_string()),
    ]);
    let search = SearchClient::new(StubBackend::with_results(&["A", "B", "C"]));
    let workflow = SearchWorkflow::new(provider.clone(), search);

    let outcome = workflow.run("What's new with Rust?").await;

    assert_eq!(outcome.content, "Rust 1.88 shipped in June.");
    assert_eq!(outcome.metadata.search_query, "latest rust release");
    assert_eq!(outcome.metadata.current_step, "answer_generated");
    assert!(outcome.metadata.success);

    // The summarize prompt carries the rendered results and the question.
    assert_eq!(provider.call_count(), 2);
    let summary_prompt = provider.prompt(1);
    assert!(summary_prompt.contains("Search Results:"));
    assert!(summary_prompt.contains("1. A"));
    assert!(summary_prompt.contains("Original Question: What's new with Rust?"));
}

#[tokio::test]
async fn rewrite_failure_falls_back_to_original_question() {
    let provider = ScriptedProvider::new(vec![
        Err("rate limited".to_string()),
        Ok("an answer anyway".to_string()),
    ]);
    let search = SearchClient::new(StubBackend::with_results(&["A"]));
    let workflow = SearchWorkflow::new(provider, search);

    let outcome = workflow.run("original question text").await;

    // Fallback substitution, and the run never halts early.
    assert_eq!(outcome.metadata.search_query, "original question text");
    assert_eq!(outcome.metadata.current_step, "answer_generated");
    assert!(outcome.metadata.success);
    assert_eq!(outcome.content, "an answer anyway");
}

#[tokio::test]
async fn search_failure_degrades_into_summarizer_input() {
    let provider = ScriptedProvider::new(vec![
        Ok("some query".to_string()),
        Ok("summary of nothing".to_string()),
    ]);
    let search = SearchClient::new(StubBackend::failing("dns lookup failed"));
    let workflow = SearchWorkflow::new(provider.clone(), search);

    let outcome = workflow.run("a question").await;

    // The summarizer still ran, over the failure literal.
    assert_eq!(provider.call_count(), 2);
    let summary_prompt = provider.prompt(1);
    let results_slot = summary_prompt
        .split("Search Results:\n")
        .nth(1)
        .expect("summarize prompt has a results slot");
    assert!(results_slot.trim_start().starts_with("Search failed: "));
    assert!(results_slot.contains("dns lookup failed"));

    assert_eq!(outcome.metadata.current_step, "answer_generated");
    assert!(outcome.metadata.success);
}

#[tokio::test]
async fn summarize_failure_is_reported_in_tag_and_content() {
    let provider = ScriptedProvider::new(vec![
        Ok("some query".to_string()),
        Err("model overloaded".to_string()),
    ]);
    let search = SearchClient::new(StubBackend::with_results(&["A"]));
    let workflow = SearchWorkflow::new(provider, search);

    let outcome = workflow.run("a question").await;

    assert!(outcome.content.starts_with("Answer generation failed: "));
    assert!(outcome.metadata.current_step.starts_with("answer_error: "));
    assert!(!outcome.metadata.success);
}

#[tokio::test]
async fn run_always_yields_content_and_a_known_tag() {
    let scripts: Vec<Vec<Result<String, String>>> = vec![
        vec![Ok("q".to_string()), Ok("a".to_string())],
        vec![Err("e1".to_string()), Ok("a".to_string())],
        vec![Ok("q".to_string()), Err("e2".to_string())],
        vec![Err("e1".to_string()), Err("e2".to_string())],
    ];

    for replies in scripts {
        let provider = ScriptedProvider::new(replies);
        let search = SearchClient::new(StubBackend::with_results(&["A"]));
        let workflow = SearchWorkflow::new(provider, search);

        let outcome = workflow.run("q").await;
        assert!(!outcome.content.is_empty());
        assert!(
            tag_in_vocabulary(&outcome.metadata.current_step),
            "unknown tag: {}",
            outcome.metadata.current_step
        );
        assert_eq!(
            outcome.metadata.success,
            !outcome.metadata.current_step.contains("error")
        );
    }
}

#[tokio::test]
async fn strict_path_aborts_on_search_failure() {
    let provider = ScriptedProvider::new(vec![Ok("some query".to_string())]);
    let search = SearchClient::new(StubBackend::failing("dns lookup failed"));
    let workflow = SearchWorkflow::new(provider.clone(), search);

    let outcome = workflow.run_step_by_step("a question").await;

    assert!(!outcome.metadata.success);
    assert!(outcome.content.starts_with("Processing failed: "));
    assert!(
        outcome
            .metadata
            .error
            .as_deref()
            .unwrap()
            .contains("dns lookup failed")
    );
    // Contrast with the tolerant path: the summarizer never ran.
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn strict_path_success_metadata() {
    let provider = ScriptedProvider::new(vec![
        Ok("some query".to_string()),
        Ok("final answer".to_string()),
    ]);
    let search = SearchClient::new(StubBackend::with_results(&["A", "B"]));
    let workflow = SearchWorkflow::new(provider, search);

    let outcome = workflow.run_step_by_step("a question").await;

    assert!(outcome.metadata.success);
    assert_eq!(outcome.content, "final answer");
    assert_eq!(outcome.metadata.search_query, "some query");
    assert_eq!(outcome.metadata.processing_method, "step_by_step");
    assert!(outcome.metadata.search_results_length > 0);
    assert!(outcome.metadata.error.is_none());
}

#[tokio::test]
async fn trace_records_every_transition() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![Ok("q".to_string()), Ok("a".to_string())]);
    let search = SearchClient::new(StubBackend::with_results(&["A"]));
    let workflow = SearchWorkflow::new(provider, search)
        .with_trace(PipelineLogger::new(dir.path().to_path_buf()).unwrap());

    let outcome = workflow.run("question").await;
    assert!(outcome.metadata.success);

    let trace = std::fs::read_to_string(dir.path().join("runs.jsonl")).unwrap();
    let steps: Vec<String> = trace
        .lines()
        .map(|line| {
            serde_json::from_str::<serde_json::Value>(line).unwrap()["step"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect();

    assert_eq!(
        steps,
        vec![
            "initialized",
            "query_processed",
            "search_completed",
            "answer_generated"
        ]
    );
}
