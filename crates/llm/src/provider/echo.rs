use async_trait::async_trait;

use crate::{
    error::LlmError,
    messages::{ChatCompletionRequest, ChatRole},
    provider::Provider,
};

/// Answers with the text of the last user message.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoProvider;

#[async_trait]
impl Provider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(&self, request: &ChatCompletionRequest) -> Result<String, LlmError> {
        let message = request
            .messages
            .iter()
            .rev()
            .find(|message| message.role == ChatRole::User)
            .ok_or_else(|| LlmError::InvalidRequest("at least one user message is required".to_string()))?;

        Ok(message.content.as_ref().map(|content| content.text()).unwrap_or_default())
    }
}
