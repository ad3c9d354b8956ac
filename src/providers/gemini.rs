use serde_json::{Value, json};

use super::{CompletionProvider, CompletionRequest, ProviderHttpClient};
use crate::errors::ProviderError;
use crate::types::ModelId;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiProvider {
    http: ProviderHttpClient,
    key: String,
    model: ModelId,
}

impl GeminiProvider {
    pub fn new(key: String) -> Result<Self, ProviderError> {
        let model = std::env::var("MODEL").ok().map(ModelId::new);
        Self::new_with_model(key, model)
    }

    pub fn new_with_model(key: String, model: Option<ModelId>) -> Result<Self, ProviderError> {
        if key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey("gemini".to_string()));
        }

        let http = ProviderHttpClient::default()?;
        let model = model.unwrap_or_else(ModelId::gemini_flash);

        Ok(Self { http, key, model })
    }
}

#[async_trait::async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, req: &CompletionRequest) -> Result<String, ProviderError> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": req.prompt }],
            }],
            "generationConfig": {
                "temperature": req.temperature,
            },
        });

        let url = format!("{API_BASE}/{}:generateContent", self.model.as_str());
        let res = self
            .http
            .client()
            .post(&url)
            .header("x-goog-api-key", &self.key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let err_text = res.text().await?;
            return Err(ProviderError::Api(format!(
                "Gemini API Error {status}: {err_text}"
            )));
        }

        let response_json: Value = res.json().await?;

        let parts = response_json["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| {
                ProviderError::InvalidResponse(
                    "Unexpected API response: missing 'candidates[0].content.parts'".to_string(),
                )
            })?;

        let mut text = String::new();
        for part in parts {
            if let Some(t) = part.get("text").and_then(|v| v.as_str()) {
                text.push_str(t);
            }
        }

        if text.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "No text parts in candidate".to_string(),
            ));
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &ModelId {
        &self.model
    }

    fn validate_config(&self) -> Result<(), ProviderError> {
        if self.key.is_empty() {
            return Err(ProviderError::Config("Gemini API key is empty".to_string()));
        }
        Ok(())
    }
}
