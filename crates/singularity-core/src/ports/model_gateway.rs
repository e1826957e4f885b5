//! Model gateway port definition.
//!
//! This port abstracts the upstream chat-completion service. It is pure
//! request/response: no conversation state lives behind it.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::chat::{ChatMessage, ContentPart};
use crate::settings::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

/// Sampling options for a single completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    /// Upstream model identifier (e.g. `gpt-4o`).
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionOptions {
    /// Options for `model` with the default temperature and token budget.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// A text completion request: the full role-tagged context.
#[derive(Debug, Clone)]
pub struct TextCompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub options: CompletionOptions,
}

/// A vision completion request.
///
/// `messages` is the prior context (system prompt and, optionally, history).
/// The gateway appends a multi-part user message built from `prompt` and
/// `encoded_image`.
#[derive(Debug, Clone)]
pub struct VisionCompletionRequest {
    pub prompt: String,
    /// Base64-encoded PNG.
    pub encoded_image: String,
    pub messages: Vec<ChatMessage>,
    pub options: CompletionOptions,
}

impl VisionCompletionRequest {
    /// The multi-part user message carrying the prompt and the image.
    #[must_use]
    pub fn user_message(&self) -> ChatMessage {
        ChatMessage::user(vec![
            ContentPart::Text {
                text: self.prompt.clone(),
            },
            ContentPart::Image {
                encoded_image: self.encoded_image.clone(),
            },
        ])
    }

    /// Prior context followed by the multi-part user message.
    #[must_use]
    pub fn into_messages(self) -> Vec<ChatMessage> {
        let user = self.user_message();
        let mut messages = self.messages;
        messages.push(user);
        messages
    }
}

/// A successful completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Identifier of the model that answered.
    pub model: String,
    /// Generated text, trimmed.
    pub content: String,
}

/// Errors returned by a model gateway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never produced an HTTP response.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The upstream call exceeded the configured timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The upstream API answered with an error status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response could not be understood.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// The gateway is misconfigured (e.g. missing API key).
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl GatewayError {
    /// Whether retrying the same request could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidResponse { .. } | Self::Configuration { .. } => false,
        }
    }
}

/// Which kind of completion a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Text,
    Vision,
}

/// Render a gateway failure in the legacy string shape.
///
/// Used where a failure must still be recorded as an assistant message.
#[must_use]
pub fn render_gateway_failure(kind: CompletionKind, model: &str, err: &GatewayError) -> String {
    match kind {
        CompletionKind::Text => format!("[OpenAI Error using {model} for text] {err}"),
        CompletionKind::Vision => format!("[Vision Error using {model} for image] {err}"),
    }
}

/// Port for the upstream chat-completion service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Complete a text conversation.
    async fn complete_text(
        &self,
        request: TextCompletionRequest,
    ) -> Result<Completion, GatewayError>;

    /// Complete a vision request (prompt plus one composed image).
    async fn complete_vision(
        &self,
        request: VisionCompletionRequest,
    ) -> Result<Completion, GatewayError>;
}
