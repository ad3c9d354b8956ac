use std::time::Duration;

use reqwest::Client;

use super::{RESULT_COUNT, SearchBackend, SearchResponse};
use crate::errors::SearchError;

const ENDPOINT: &str = "https://serpapi.com/search.json";

pub struct SerpApiBackend {
    client: Client,
    key: String,
}

impl SerpApiBackend {
    /// Fails fast on an absent credential; a bad key should abort startup,
    /// not the first query.
    pub fn new(key: String) -> Result<Self, SearchError> {
        if key.trim().is_empty() {
            return Err(SearchError::MissingApiKey("serpapi".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, key })
    }
}

#[async_trait::async_trait]
impl SearchBackend for SerpApiBackend {
    async fn fetch(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let num = RESULT_COUNT.to_string();
        let res = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("q", query),
                ("api_key", self.key.as_str()),
                ("engine", "google"),
                ("num", num.as_str()),
                ("safe", "active"),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let err_text = res.text().await?;
            return Err(SearchError::Api(format!(
                "SerpAPI Error {status}: {err_text}"
            )));
        }

        Ok(res.json::<SearchResponse>().await?)
    }

    fn name(&self) -> &str {
        "serpapi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_key_at_construction() {
        assert!(matches!(
            SerpApiBackend::new(String::new()),
            Err(SearchError::MissingApiKey(_))
        ));
        assert!(matches!(
            SerpApiBackend::new("   ".to_string()),
            Err(SearchError::MissingApiKey(_))
        ));
    }

    #[test]
    fn accepts_real_looking_key() {
        let backend = SerpApiBackend::new("serp-key-123".to_string()).unwrap();
        assert_eq!(backend.name(), "serpapi");
    }
}
