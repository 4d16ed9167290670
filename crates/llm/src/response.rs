//! Builds OpenAI-compatible responses out of finished text.
//!
//! A generation that completed upstream is turned into exactly one of two shapes:
//!
//! - a `chat.completion` JSON body with usage statistics, or
//! - a single `chat.completion.chunk` Server-Sent Event carrying the whole text.
//!
//! Streaming always delivers the full text as one chunk. Clients expecting
//! token-by-token delivery get everything in the first event.

use std::sync::Arc;

use axum::http::StatusCode;
use serde::Serialize;

use crate::{
    error::EmitError,
    ids::{Clock, IdGenerator, SystemClock, UuidGenerator},
    messages::{
        AssistantMessage, ChatChoice, ChatChoiceDelta, ChatCompletionChunk, ChatCompletionResponse, ChatMessageDelta,
        ChatRole, FinishReason, ObjectType, Usage,
    },
    sink::ResponseChannel,
    token_counter::estimate_tokens,
};

const SSE_DATA_PREFIX: &[u8] = b"data: ";
const SSE_EVENT_TERMINATOR: &[u8] = b"\n\n";
const SSE_DONE_EVENT: &[u8] = b"data: [DONE]\n\n";

/// Turns final text into a response and writes it to a [`ResponseChannel`].
///
/// The builder holds no per-request state and can be shared between requests.
#[derive(Clone)]
pub struct ResponseBuilder {
    model: String,
    done_marker: bool,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl ResponseBuilder {
    /// Creates a builder labelling every response with `model`.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            done_marker: false,
            ids: Arc::new(UuidGenerator),
            clock: Arc::new(SystemClock),
        }
    }

    /// Terminate event streams with a `data: [DONE]` event.
    pub fn with_done_marker(mut self, done_marker: bool) -> Self {
        self.done_marker = done_marker;
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The model label put on every response.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Writes `text` to `sink`, as an event stream if `streaming` is set and as a
    /// single JSON body otherwise.
    ///
    /// The payload is encoded before anything is written, so a serialization
    /// failure leaves the sink untouched. Nothing is written after a failed write.
    pub fn emit(&self, text: &str, streaming: bool, sink: &mut dyn ResponseChannel) -> Result<(), EmitError> {
        if streaming {
            self.emit_stream(text, sink)
        } else {
            self.emit_single(text, sink)
        }
    }

    fn emit_stream(&self, text: &str, sink: &mut dyn ResponseChannel) -> Result<(), EmitError> {
        let event = sse_event(&self.chunk(text))?;

        sink.write_bytes(&event).map_err(EmitError::SinkWrite)?;
        sink.flush().map_err(EmitError::SinkWrite)?;

        if self.done_marker {
            sink.write_bytes(SSE_DONE_EVENT).map_err(EmitError::SinkWrite)?;
            sink.flush().map_err(EmitError::SinkWrite)?;
        }

        log::debug!("Streamed {} bytes of completion text in one chunk", text.len());

        Ok(())
    }

    fn emit_single(&self, text: &str, sink: &mut dyn ResponseChannel) -> Result<(), EmitError> {
        let response = self.completion(text);
        let body = serde_json::to_vec(&response)?;

        sink.write_json(StatusCode::OK, body).map_err(EmitError::SinkWrite)?;

        log::debug!(
            "Returned completion with {} estimated tokens",
            response.usage.completion_tokens
        );

        Ok(())
    }

    /// The single chunk of a streaming response.
    pub fn chunk(&self, text: &str) -> ChatCompletionChunk {
        ChatCompletionChunk {
            id: self.ids.generate(),
            object: ObjectType::ChatCompletionChunk,
            created: self.clock.now(),
            model: self.model.clone(),
            choices: vec![ChatChoiceDelta {
                index: 0,
                delta: ChatMessageDelta {
                    content: text.to_string(),
                },
                logprobs: None,
                finish_reason: None,
            }],
        }
    }

    /// The complete non-streaming response, including estimated usage.
    pub fn completion(&self, text: &str) -> ChatCompletionResponse {
        let completion_tokens = u32::try_from(estimate_tokens(text)).unwrap_or(u32::MAX);

        ChatCompletionResponse {
            id: self.ids.generate(),
            object: ObjectType::ChatCompletion,
            created: self.clock.now(),
            model: self.model.clone(),
            choices: vec![ChatChoice {
                index: 0,
                message: AssistantMessage {
                    role: ChatRole::Assistant,
                    content: text.to_string(),
                    refusal: None,
                    annotation: Vec::new(),
                },
                logprobs: None,
                finish_reason: FinishReason::Stop,
            }],
            // The prompt never reaches this layer.
            usage: Usage {
                prompt_tokens: 0,
                completion_tokens,
                total_tokens: completion_tokens,
            },
        }
    }
}

/// Frames `payload` as one Server-Sent Event: `data: <json>\n\n`.
fn sse_event<T: Serialize>(payload: &T) -> Result<Vec<u8>, serde_json::Error> {
    let json = serde_json::to_vec(payload)?;

    let mut event = Vec::with_capacity(SSE_DATA_PREFIX.len() + json.len() + SSE_EVENT_TERMINATOR.len());
    event.extend_from_slice(SSE_DATA_PREFIX);
    event.extend_from_slice(&json);
    event.extend_from_slice(SSE_EVENT_TERMINATOR);

    Ok(event)
}
