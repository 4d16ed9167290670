mod echo;

use async_trait::async_trait;

use crate::{error::LlmError, messages::ChatCompletionRequest};

pub use echo::EchoProvider;

/// Produces the final text of a completion.
///
/// Whatever sits behind this trait runs to completion before the response is
/// built. Streaming requests are answered with the finished text in one event.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Name used in logs and as the `owned_by` field of the model list.
    fn name(&self) -> &str;

    /// Generate the reply to `request`.
    async fn generate(&self, request: &ChatCompletionRequest) -> Result<String, LlmError>;
}
