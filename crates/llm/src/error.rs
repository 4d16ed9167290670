use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failures while turning final text into a response on the wire.
///
/// By the time this happens the generation itself succeeded, so neither variant
/// carries anything for the client. The caller decides what to tell it.
#[derive(Debug, Error)]
pub enum EmitError {
    /// The payload could not be encoded. Nothing was written to the sink.
    #[error("Failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The sink rejected a write or flush, e.g. the client went away.
    #[error("Failed to write response: {0}")]
    SinkWrite(#[source] std::io::Error),
}

/// LLM service errors with appropriate HTTP status codes.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider failed to produce text.
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Internal server error.
    /// If Some(message), it came from a provider and can be shown.
    /// If None, it's an internal error and should not leak details.
    #[error("Internal server error")]
    InternalError(Option<String>),
}

impl LlmError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ProviderError(_) => StatusCode::BAD_GATEWAY,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string for the response.
    pub fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::ProviderError(_) => "api_error",
            Self::InternalError(_) => "internal_error",
        }
    }
}

impl From<EmitError> for LlmError {
    fn from(error: EmitError) -> Self {
        log::error!("Failed to emit completion response: {error}");
        Self::InternalError(None)
    }
}

/// Error response format compatible with OpenAI API.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    message: String,
    r#type: String,
    code: u16,
}

impl IntoResponse for LlmError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            match &self {
                Self::InternalError(Some(provider_msg)) => {
                    log::error!("Provider returned internal error: {provider_msg}");
                }
                Self::InternalError(None) => {
                    // Details are logged where the error was created
                    log::error!("Internal server error occurred");
                }
                _ => {
                    log::error!("Server error ({}): {}", status.as_u16(), self);
                }
            }
        }

        let message = match &self {
            Self::InternalError(Some(provider_msg)) => provider_msg.clone(),
            Self::InternalError(None) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        let error_response = ErrorResponse {
            error: ErrorDetails {
                message,
                r#type: self.error_type().to_string(),
                code: status.as_u16(),
            },
        };

        (status, Json(error_response)).into_response()
    }
}
