use std::env;

use crate::errors::ConfigError;
use crate::types::ModelId;

pub const COMPLETION_KEY_VAR: &str = "GEMINI_API_KEY";
pub const SEARCH_KEY_VAR: &str = "SERPAPI_KEY";
pub const MODEL_VAR: &str = "MODEL";

/// Credentials and model selection, resolved once at startup. Both keys are
/// required before any component is constructed; a missing or placeholder
/// value aborts startup rather than failing on the first call.
#[derive(Debug, Clone)]
pub struct Config {
    pub completion_key: String,
    pub search_key: String,
    pub model: ModelId,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let completion_key = required(COMPLETION_KEY_VAR)?;
        let search_key = required(SEARCH_KEY_VAR)?;
        let model = env::var(MODEL_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(ModelId::new)
            .unwrap_or_else(ModelId::gemini_flash);

        Ok(Self {
            completion_key,
            search_key,
            model,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::MissingVar(name))?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ConfigError::MissingVar(name));
    }
    if value == placeholder_value(name) {
        return Err(ConfigError::PlaceholderVar(name));
    }
    Ok(value)
}

// Scaffolding .env files ship keys as e.g. `GEMINI_API_KEY=your_gemini_api_key`.
fn placeholder_value(name: &str) -> String {
    format!("your_{}", name.to_ascii_lowercase())
}
