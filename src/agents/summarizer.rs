use std::sync::Arc;

use crate::providers::{CompletionProvider, CompletionRequest};
use crate::search::OrganicResult;
use crate::types::StageOutput;

// Warmer sampling for natural phrasing.
const SUMMARIZE_TEMPERATURE: f32 = 0.7;

const GENERIC_QUESTION: &str = "Please provide a summary of the information.";

const SUMMARIZE_TEMPLATE: &str = r#"You are an expert information synthesizer. Based on the search results provided, create a comprehensive yet concise answer to the user's question.

Guidelines:
1. Synthesize information from multiple sources when possible
2. Keep the answer focused and relevant to the original question
3. Include specific details, dates, and facts when available
4. If information is conflicting or unclear, mention this
5. Keep the response conversational but informative
6. Aim for 2-4 sentences unless more detail is clearly needed

Original Question: {original_question}

Search Results:
{search_results}

Answer:"#;

/// Synthesizes a short answer from rendered search results and the original
/// question via one templated completion call.
pub struct Summarizer {
    provider: Arc<dyn CompletionProvider>,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// One completion call, no retries. An empty question falls back to a
    /// generic summarization instruction. Failures come back as the designed
    /// error literal, never as an Err.
    pub async fn summarize(&self, results_text: &str, question: &str) -> StageOutput {
        let question = if question.trim().is_empty() {
            GENERIC_QUESTION
        } else {
            question
        };

        let req = CompletionRequest {
            prompt: SUMMARIZE_TEMPLATE
                .replace("{search_results}", results_text)
                .replace("{original_question}", question),
            temperature: SUMMARIZE_TEMPERATURE,
        };

        match self.provider.complete(&req).await {
            Ok(text) => StageOutput::ok(text.trim()),
            Err(e) => StageOutput::failed(format!("Error generating answer: {e}"), e.to_string()),
        }
    }

    /// Secondary accessor over structured records: renders a numbered
    /// title + snippet list and delegates to the primary path.
    pub async fn summarize_structured(
        &self,
        results: &[OrganicResult],
        question: &str,
    ) -> StageOutput {
        self.summarize(&render_numbered(results), question).await
    }
}

fn render_numbered(results: &[OrganicResult]) -> String {
    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, result.title));
        out.push_str(&format!("   {}\n\n", result.snippet));
    }
    out
}
