use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Missing API key for {0}")]
    MissingApiKey(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Missing API key for {0}")]
    MissingApiKey(String),

    #[error("Search API error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Environment variable {0} still holds a placeholder value")]
    PlaceholderVar(&'static str),
}

/// Errors raised outside the three stage calls. Stage failures never surface
/// here; they are absorbed into the state record.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Trace write failed: {0}")]
    Trace(#[from] std::io::Error),
}
