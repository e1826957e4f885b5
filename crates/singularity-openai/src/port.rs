//! `ModelGateway` implementation for `OpenAiClient`.
//!
//! Internal errors are mapped to `GatewayError` here and nowhere else.

use async_trait::async_trait;
use singularity_core::{
    Completion, GatewayError, ModelGateway, TextCompletionRequest, VisionCompletionRequest,
};
use tracing::warn;

use crate::client::{OpenAiClient, Reply};
use crate::error::OpenAiError;
use crate::http::ChatBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `OpenAiError` to core `GatewayError`.
fn map_error(err: OpenAiError) -> GatewayError {
    match err {
        OpenAiError::ApiRequestFailed { status, message } => GatewayError::Api { status, message },
        OpenAiError::InvalidResponse { message } => GatewayError::InvalidResponse { message },
        OpenAiError::MissingApiKey => GatewayError::Configuration {
            message: "OPENAI_API_KEY is not set".to_string(),
        },
        OpenAiError::Timeout { timeout_secs } => GatewayError::Timeout { timeout_secs },
        OpenAiError::Network(e) => GatewayError::Transport {
            message: e.to_string(),
        },
        OpenAiError::JsonParse(e) => GatewayError::InvalidResponse {
            message: e.to_string(),
        },
    }
}

fn to_completion(reply: Reply) -> Completion {
    Completion {
        model: reply.model,
        content: reply.content,
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: ChatBackend> ModelGateway for OpenAiClient<B> {
    async fn complete_text(
        &self,
        request: TextCompletionRequest,
    ) -> Result<Completion, GatewayError> {
        self.chat(&request.messages, &request.options)
            .await
            .map(to_completion)
            .map_err(|e| {
                warn!(model = %request.options.model, error = %e, "Text completion failed");
                map_error(e)
            })
    }

    async fn complete_vision(
        &self,
        request: VisionCompletionRequest,
    ) -> Result<Completion, GatewayError> {
        let options = request.options.clone();
        let messages = request.into_messages();
        self.chat(&messages, &options)
            .await
            .map(to_completion)
            .map_err(|e| {
                warn!(model = %options.model, error = %e, "Vision completion failed");
                map_error(e)
            })
    }
}
