//! Configuration of the chat completion endpoints.

use std::borrow::Cow;

use serde::Deserialize;

/// Model label used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-3-flash";

/// LLM configuration for the chat completion endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmConfig {
    /// Whether the LLM functionality is enabled.
    enabled: bool,

    /// The path where the LLM endpoints will be mounted.
    pub path: Cow<'static, str>,

    /// Model name reported in every response and in the model list.
    pub model: String,

    /// Whether event streams end with a `data: [DONE]` event.
    ///
    /// Off by default. Streams then end when the connection closes.
    pub done_marker: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: Cow::Borrowed("/llm"),
            model: DEFAULT_MODEL.to_string(),
            done_marker: false,
        }
    }
}

impl LlmConfig {
    /// Whether the LLM functionality is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}
