use std::sync::Arc;
use std::time::Duration;

pub mod gemini;

use crate::config::Config;
use crate::errors::ProviderError;
use crate::types::ModelId;
use reqwest::Client;

pub(crate) struct ProviderHttpClient {
    client: Client,
}

impl ProviderHttpClient {
    pub fn new(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    pub fn default() -> Result<Self, ProviderError> {
        Self::new(120)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// One templated prompt plus its sampling temperature. The rewrite stage runs
/// cool (0.3), the synthesis stage warmer (0.7).
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
}

/// Trait for completion providers
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion call and return the raw text
    async fn complete(&self, req: &CompletionRequest) -> Result<String, ProviderError>;

    /// Get the name of this provider
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &ModelId;

    /// Validate that this provider is properly configured
    fn validate_config(&self) -> Result<(), ProviderError>;
}

pub fn create_provider(config: &Config) -> Result<Arc<dyn CompletionProvider>, ProviderError> {
    let provider = gemini::GeminiProvider::new_with_model(
        config.completion_key.clone(),
        Some(config.model.clone()),
    )?;
    provider.validate_config()?;
    Ok(Arc::new(provider))
}
