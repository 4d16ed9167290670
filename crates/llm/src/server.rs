use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use config::LlmConfig;

use crate::{
    ids::{Clock, SystemClock},
    messages::{ChatCompletionRequest, Model, ModelsResponse, ObjectType},
    provider::Provider,
    response::ResponseBuilder,
    sink::HttpResponseSink,
};

#[derive(Clone)]
pub(crate) struct LlmServer {
    shared: Arc<LlmServerInner>,
}

struct LlmServerInner {
    provider: Arc<dyn Provider>,
    builder: ResponseBuilder,
    started_at: u64,
}

impl LlmServer {
    pub fn new(config: &LlmConfig, provider: Arc<dyn Provider>) -> Self {
        log::debug!(
            "Initializing LLM server with provider '{}' and model label '{}'",
            provider.name(),
            config.model
        );

        let builder = ResponseBuilder::new(config.model.clone()).with_done_marker(config.done_marker);

        Self {
            shared: Arc::new(LlmServerInner {
                provider,
                builder,
                started_at: SystemClock.now(),
            }),
        }
    }

    /// Runs the provider and writes its text in the shape the request asked for.
    pub async fn completions(&self, request: ChatCompletionRequest) -> crate::Result<Response> {
        let text = self.shared.provider.generate(&request).await?;

        log::debug!(
            "Provider '{}' returned {} bytes of text",
            self.shared.provider.name(),
            text.len()
        );

        let mut sink = HttpResponseSink::for_request(request.stream);
        self.shared.builder.emit(&text, request.stream, &mut sink)?;

        Ok(sink.into_response())
    }

    pub fn list_models(&self) -> ModelsResponse {
        ModelsResponse {
            object: ObjectType::List,
            data: vec![Model {
                id: self.shared.builder.model().to_string(),
                object: ObjectType::Model,
                created: self.shared.started_at,
                owned_by: self.shared.provider.name().to_string(),
            }],
        }
    }
}
