use std::sync::Arc;

use crate::providers::{CompletionProvider, CompletionRequest};
use crate::types::StageOutput;

// Cooler sampling keeps the reformulation focused.
const REWRITE_TEMPERATURE: f32 = 0.3;

const REWRITE_TEMPLATE: &str = r#"You are a search query optimizer. Convert the user's question into an effective web search query.

Rules:
1. Keep it concise (3-6 keywords)
2. Use specific terms that will find recent, relevant results
3. Include time-related keywords if the question implies recency (like "recent", "latest", "new")
4. Remove unnecessary words like "what", "how", "tell me about"
5. Focus on the core topic and context

User Question: {user_question}

Search Query:"#;

/// Turns a natural-language question into a compact keyword query via one
/// templated completion call.
pub struct QueryRewriter {
    provider: Arc<dyn CompletionProvider>,
}

impl QueryRewriter {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// One completion call, no retries. Failures come back as the designed
    /// error literal in the text channel, never as an Err.
    pub async fn rewrite(&self, question: &str) -> StageOutput {
        let req = CompletionRequest {
            prompt: REWRITE_TEMPLATE.replace("{user_question}", question),
            temperature: REWRITE_TEMPERATURE,
        };

        match self.provider.complete(&req).await {
            Ok(text) => StageOutput::ok(clean_query(&text)),
            Err(e) => StageOutput::failed(
                format!("Error generating search query: {e}"),
                e.to_string(),
            ),
        }
    }
}

/// Trim, drop quote characters, collapse newlines to spaces.
fn clean_query(raw: &str) -> String {
    raw.trim().replace('"', "").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use crate::types::ModelId;
    use proptest::prelude::*;
    use std::sync::Mutex;

    struct CannedProvider {
        model: ModelId,
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedProvider {
        fn ok(reply: &str) -> Self {
            Self {
                model: ModelId::new("canned"),
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                model: ModelId::new("canned"),
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl CompletionProvider for CannedProvider {
        async fn complete(&self, req: &CompletionRequest) -> Result<String, ProviderError> {
            self.prompts.lock().unwrap().push(req.prompt.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(ProviderError::Api(message.clone())),
            }
        }

        fn name(&self) -> &str {
            "canned"
        }

        fn model(&self) -> &ModelId {
            &self.model
        }

        fn validate_config(&self) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    #[test]
    fn clean_query_strips_quotes_and_newlines() {
        assert_eq!(clean_query("  \"rust async\"  "), "rust async");
        assert_eq!(clean_query("latest\nrust\nrelease"), "latest rust release");
        assert_eq!(clean_query("plain"), "plain");
    }

    #[tokio::test]
    async fn rewrite_cleans_provider_output() {
        let provider = Arc::new(CannedProvider::ok("\"latest rust\nrelease\"\n"));
        let rewriter = QueryRewriter::new(provider.clone());

        let out = rewriter.rewrite("What's new in Rust?").await;
        assert!(!out.is_failure());
        assert_eq!(out.text, "latest rust release");

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("What's new in Rust?"));
        assert!(prompts[0].contains("3-6 keywords"));
    }

    #[tokio::test]
    async fn rewrite_failure_becomes_error_literal() {
        let provider = Arc::new(CannedProvider::failing("rate limited"));
        let rewriter = QueryRewriter::new(provider);

        let out = rewriter.rewrite("anything").await;
        assert!(out.is_failure());
        assert!(out.text.starts_with("Error generating search query: "));
        assert!(out.text.contains("rate limited"));
    }

    #[tokio::test]
    async fn rewrite_is_deterministic_for_a_fixed_provider() {
        let provider = Arc::new(CannedProvider::ok("rust 2024 edition"));
        let rewriter = QueryRewriter::new(provider);

        let first = rewriter.rewrite("Tell me about the 2024 edition").await;
        let second = rewriter.rewrite("Tell me about the 2024 edition").await;
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn cleaned_query_has_no_quotes_or_newlines(raw in ".*") {
            let cleaned = clean_query(&raw);
            prop_assert!(!cleaned.contains('"'));
            prop_assert!(!cleaned.contains('\n'));
        }
    }
}
