//! Chat completion client.

use singularity_core::{ChatMessage, CompletionOptions};
use tracing::debug;

use crate::config::OpenAiClientConfig;
use crate::error::{OpenAiError, OpenAiResult};
use crate::http::{ChatBackend, ReqwestBackend};
use crate::models::ChatCompletionRequest;

/// Default client using the reqwest HTTP backend.
pub type OpenAiGateway = OpenAiClient<ReqwestBackend>;

/// A trimmed reply and the model that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reply {
    pub model: String,
    pub content: String,
}

/// Client for an OpenAI-compatible chat completions API.
///
/// Generic over the HTTP backend so tests can inject a fake. Use
/// [`OpenAiGateway`] in production code.
pub struct OpenAiClient<B: ChatBackend> {
    pub(crate) backend: B,
}

impl OpenAiGateway {
    /// Create a client with the given configuration.
    pub fn new(config: &OpenAiClientConfig) -> OpenAiResult<Self> {
        Ok(Self {
            backend: ReqwestBackend::new(config)?,
        })
    }
}

impl<B: ChatBackend> OpenAiClient<B> {
    #[cfg(test)]
    pub(crate) const fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Send the messages and return the first choice, trimmed.
    ///
    /// The reported model falls back to the requested one when the
    /// response omits it.
    pub(crate) async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> OpenAiResult<Reply> {
        let request = ChatCompletionRequest::new(messages, options);
        let response = self.backend.post_chat(&request).await?;

        let content = response
            .first_content()
            .ok_or_else(|| OpenAiError::InvalidResponse {
                message: "response contained no choices".to_string(),
            })?
            .trim()
            .to_string();
        let model = response.model.unwrap_or_else(|| options.model.clone());

        debug!(model = %model, reply_len = content.len(), "Chat completion received");
        Ok(Reply { model, content })
    }
}
