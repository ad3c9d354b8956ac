use serde::{Deserialize, Serialize};

pub mod serpapi;

use crate::errors::SearchError;
use crate::types::StageOutput;

/// Organic results requested (and rendered) per query.
pub const RESULT_COUNT: usize = 5;

pub const NO_TITLE: &str = "No title";
pub const NO_SNIPPET: &str = "No description available";

/// Wire-level organic result; any field may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResult {
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub link: Option<String>,
}

/// Organic result with placeholders substituted for missing fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganicResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl From<RawResult> for OrganicResult {
    fn from(raw: RawResult) -> Self {
        Self {
            title: raw.title.unwrap_or_else(|| NO_TITLE.to_string()),
            snippet: raw.snippet.unwrap_or_else(|| NO_SNIPPET.to_string()),
            link: raw.link.unwrap_or_default(),
        }
    }
}

/// Provider response. `organic_results` is absent entirely when the provider
/// has nothing organic to return, which renders differently from an empty
/// list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    pub organic_results: Option<Vec<RawResult>>,
}

/// Trait for search providers
#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one search request for the top organic results
    async fn fetch(&self, query: &str) -> Result<SearchResponse, SearchError>;

    /// Get the name of this backend
    fn name(&self) -> &str;
}

pub struct SearchClient {
    backend: Box<dyn SearchBackend>,
}

impl SearchClient {
    pub fn new(backend: Box<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    pub fn serpapi(key: String) -> Result<Self, SearchError> {
        Ok(Self::new(Box::new(serpapi::SerpApiBackend::new(key)?)))
    }

    /// Primary accessor: one request, rendered into the fixed plain-text
    /// block. Failures come back as the designed error literal, never as an
    /// Err.
    pub async fn search(&self, query: &str) -> StageOutput {
        match self.backend.fetch(query).await {
            Ok(response) => StageOutput::ok(render_results(&response)),
            Err(e) => StageOutput::failed(format!("Error performing search: {e}"), e.to_string()),
        }
    }

    /// Secondary accessor over the same underlying call. An absent
    /// organic-results field yields an empty list.
    pub async fn search_structured(&self, query: &str) -> Result<Vec<OrganicResult>, SearchError> {
        let response = self.backend.fetch(query).await?;
        Ok(response
            .organic_results
            .unwrap_or_default()
            .into_iter()
            .take(RESULT_COUNT)
            .map(OrganicResult::from)
            .collect())
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}

/// Render up to [`RESULT_COUNT`] results in provider order:
/// header line, then per result a numbered title line, an indented snippet
/// line and an indented source line, blank line between entries, trailing
/// whitespace trimmed.
pub fn render_results(response: &SearchResponse) -> String {
    let Some(results) = &response.organic_results else {
        return "No search results found.".to_string();
    };

    let mut out = String::from("Search Results:\n\n");

    for (i, raw) in results.iter().take(RESULT_COUNT).enumerate() {
        let result = OrganicResult::from(raw.clone());
        out.push_str(&format!("{}. {}\n", i + 1, result.title));
        out.push_str(&format!("   {}\n", result.snippet));
        out.push_str(&format!("   Source: {}\n\n", result.link));
    }

    out.trim_end().to_string()
}
