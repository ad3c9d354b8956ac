use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn gemini_flash() -> Self {
        Self::new("gemini-2.0-flash-exp")
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of one stage call. Failures travel as values: `text` always holds
/// printable output (the designed error literal on failure), so downstream
/// stages never see an exception-shaped input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageOutput {
    pub text: String,
    pub error: Option<String>,
}

impl StageOutput {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: None,
        }
    }

    pub fn failed(text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: Some(message.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}
