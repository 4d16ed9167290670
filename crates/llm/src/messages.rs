use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// OpenAI-compatible chat completion request.
///
/// Only the fields the relay needs are modeled, anything else in the body is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    /// The model the client asked for.
    pub model: String,
    /// The conversation so far.
    pub messages: Vec<ChatMessage>,
    /// Whether the client wants a Server-Sent Events response.
    #[serde(default)]
    pub stream: bool,
    /// Tool definitions, passed through to the provider untouched.
    #[serde(default)]
    pub tools: Option<Vec<Value>>,
}

/// Chat message in OpenAI format.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// Role of a message author.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    Developer,
    User,
    Assistant,
    Tool,
    #[serde(untagged)]
    Other(String),
}

impl AsRef<str> for ChatRole {
    fn as_ref(&self) -> &str {
        match self {
            ChatRole::System => "system",
            ChatRole::Developer => "developer",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::Tool => "tool",
            ChatRole::Other(role) => role,
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Message content is either a plain string or a list of typed parts.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A single part of a multi-part message. Non-text parts keep their type only.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub part_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessageContent {
    /// The textual content, with text parts joined by newlines.
    pub fn text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter(|part| part.part_type == "text")
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Value of the `object` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectType {
    #[serde(rename = "chat.completion")]
    ChatCompletion,
    #[serde(rename = "chat.completion.chunk")]
    ChatCompletionChunk,
    #[serde(rename = "model")]
    Model,
    #[serde(rename = "list")]
    List,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
}

/// OpenAI-compatible chat completion response.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: ObjectType,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Usage,
}

/// Chat completion choice.
#[derive(Debug, Clone, Serialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: AssistantMessage,
    pub logprobs: Option<Value>,
    pub finish_reason: FinishReason,
}

/// The full assistant reply of a non-streaming completion.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantMessage {
    pub role: ChatRole,
    pub content: String,
    pub refusal: Option<String>,
    pub annotation: Vec<Value>,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One Server-Sent Events chunk of a streaming completion.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: ObjectType,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatChoiceDelta>,
}

/// Choice of a streaming chunk. `logprobs` and `finish_reason` serialize as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatChoiceDelta {
    pub index: u32,
    pub delta: ChatMessageDelta,
    pub logprobs: Option<Value>,
    pub finish_reason: Option<FinishReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageDelta {
    pub content: String,
}

/// Model information.
#[derive(Debug, Clone, Serialize)]
pub struct Model {
    pub id: String,
    pub object: ObjectType,
    pub created: u64,
    pub owned_by: String,
}

/// Models list response.
#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub object: ObjectType,
    pub data: Vec<Model>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_non_streaming() {
        let request: ChatCompletionRequest = serde_json::from_str(
            r#"{"model":"gpt-4","messages":[{"role":"user","content":"hello"}]}"#,
        )
        .unwrap();

        assert!(!request.stream);
        assert!(request.tools.is_none());
        assert_eq!(request.messages[0].role, ChatRole::User);
    }

    #[test]
    fn unknown_roles_are_kept() {
        let message: ChatMessage = serde_json::from_str(r#"{"role":"narrator","content":"once"}"#).unwrap();

        assert_eq!(message.role, ChatRole::Other("narrator".to_string()));
        assert_eq!(message.role.to_string(), "narrator");
    }

    #[test]
    fn multi_part_content_keeps_text_parts() {
        let message: ChatMessage = serde_json::from_str(
            r#"{"role":"user","content":[
                {"type":"text","text":"first"},
                {"type":"image_url","image_url":{"url":"https://example.com/a.png"}},
                {"type":"text","text":"second"}
            ]}"#,
        )
        .unwrap();

        let text = message.content.map(|content| content.text());
        assert_eq!(text.as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn missing_content_is_none() {
        let message: ChatMessage = serde_json::from_str(r#"{"role":"assistant"}"#).unwrap();
        assert!(message.content.is_none());
    }
}
