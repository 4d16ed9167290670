//! OpenAI-compatible chat completion responses built from finished text.
//!
//! The core is [`ResponseBuilder`]: it turns a completed generation into either a
//! `chat.completion` JSON body or a single Server-Sent Event and writes it to a
//! [`ResponseChannel`]. The axum [`router`] wires it behind
//! `/v1/chat/completions` with a [`Provider`] supplying the text.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
};
use config::LlmConfig;

mod error;
mod ids;
mod messages;
mod provider;
mod response;
mod server;
mod sink;
pub mod token_counter;

pub use error::{EmitError, LlmError};
pub use ids::{Clock, IdGenerator, SystemClock, UuidGenerator};
pub use messages::{
    AssistantMessage, ChatChoice, ChatChoiceDelta, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse,
    ChatMessage, ChatMessageDelta, ChatRole, ContentPart, FinishReason, MessageContent, ObjectType, Usage,
};
pub use provider::{EchoProvider, Provider};
pub use response::ResponseBuilder;
pub use sink::{HttpResponseSink, ResponseChannel};

use server::LlmServer;

pub(crate) type Result<T> = std::result::Result<T, LlmError>;

/// Creates an axum router for LLM endpoints, mounted at the configured path.
pub fn router(config: &LlmConfig, provider: Arc<dyn Provider>) -> Router {
    let server = LlmServer::new(config, provider);

    let ai_routes = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/models", get(list_models))
        .with_state(server);

    Router::new().nest(&config.path, ai_routes)
}

/// Handle chat completion requests.
///
/// With `stream: true` the reply is a `text/event-stream` holding the whole text
/// in one chunk, otherwise a standard JSON response is returned.
async fn chat_completions(
    State(server): State<LlmServer>,
    Json(request): Json<ChatCompletionRequest>,
) -> Result<impl IntoResponse> {
    log::info!("LLM chat completions handler called for model: {}", request.model);
    log::debug!("Request has {} messages", request.messages.len());
    log::debug!("Streaming: {}", request.stream);

    if request.messages.is_empty() {
        return Err(LlmError::InvalidRequest("messages must not be empty".to_string()));
    }

    server.completions(request).await
}

/// Handle list models requests.
async fn list_models(State(server): State<LlmServer>) -> impl IntoResponse {
    let response = server.list_models();

    log::debug!("Returning {} models", response.data.len());
    Json(response)
}
