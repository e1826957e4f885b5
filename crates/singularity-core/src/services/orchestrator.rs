//! Request orchestration over the conversation store.
//!
//! The orchestrator sequences store mutations and gateway calls for the
//! three request kinds (prompt, continuation, image analysis) and enforces
//! the continuation limit and the history-append rules.
//!
//! # Concurrency
//!
//! There is exactly one conversation per process. The store sits behind a
//! single `tokio::sync::Mutex` that each request holds for its whole
//! critical section, upstream call included. Requests are therefore
//! serialized and history always alternates user/assistant in call order.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::chat::{ChatMessage, MessageRole};
use crate::domain::vision::{DEFAULT_VISION_PROMPT, ImageUpload, MAX_IMAGES};
use crate::ports::{
    CompletionKind, CompletionOptions, GatewayError, ImageCompositorPort, ModelGateway,
    TextCompletionRequest, VisionCompletionRequest, render_gateway_failure,
};
use crate::services::conversation_store::{ContinuationNotAllowed, ConversationStore};
use crate::settings::OrchestratorSettings;

/// Prefix of the user message sent for a continuation.
pub const CONTINUE_PREFIX: &str = "Continue from here:\n";

/// History text recorded when the composed image is missing or corrupt.
const INVALID_IMAGE_DATA_REPLY: &str = "[Vision Error] Invalid or empty base64 image string.";

/// Errors produced while handling a request.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("Model returned an empty response")]
    EmptyModelResponse,

    #[error("Continuation limit of {limit} reached for this prompt")]
    ContinuationLimitReached { limit: u32 },

    #[error("No previous reply to continue from")]
    NoPriorReply,

    #[error("No images provided")]
    NoImagesProvided,

    #[error("Too many images: got {count}, at most {max} allowed")]
    TooManyImages { count: usize, max: usize },

    #[error("File {file_name} is not an image (content type: {content_type})")]
    InvalidImageType {
        file_name: String,
        content_type: String,
    },

    #[error("Invalid or empty image data")]
    InvalidOrEmptyImageData,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl OrchestratorError {
    /// Recoverable refusals that are reported as a normal result.
    #[must_use]
    pub const fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::ContinuationLimitReached { .. } | Self::NoPriorReply
        )
    }

    /// Errors caused by the request itself, raised before any state mutation.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyPrompt
                | Self::NoImagesProvided
                | Self::TooManyImages { .. }
                | Self::InvalidImageType { .. }
        )
    }
}

impl From<ContinuationNotAllowed> for OrchestratorError {
    fn from(err: ContinuationNotAllowed) -> Self {
        match err {
            ContinuationNotAllowed::LimitReached { limit } => {
                Self::ContinuationLimitReached { limit }
            }
            ContinuationNotAllowed::NoPriorReply => Self::NoPriorReply,
        }
    }
}

/// Result of a top-level prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOutcome {
    pub model_used: String,
    pub response: String,
}

/// Result of a continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinueOutcome {
    pub continue_count: u32,
    pub response: String,
}

/// Result of an image analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub response: String,
    /// Name of the composed artifact sent upstream.
    pub artifact_name: String,
}

/// Read-only view of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSnapshot {
    pub messages: Vec<ChatMessage>,
    pub continue_count: u32,
    /// Whether a continuation request would be accepted right now.
    pub can_continue: bool,
    pub last_user_prompt: Option<String>,
    pub last_assistant_reply: Option<String>,
}

/// Sequences conversation store mutations and gateway calls.
pub struct ChatOrchestrator {
    gateway: Arc<dyn ModelGateway>,
    compositor: Arc<dyn ImageCompositorPort>,
    settings: OrchestratorSettings,
    store: Mutex<ConversationStore>,
}

impl ChatOrchestrator {
    /// Create an orchestrator with an empty conversation.
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        compositor: Arc<dyn ImageCompositorPort>,
        settings: OrchestratorSettings,
    ) -> Self {
        let store = ConversationStore::new(settings.history_limit);
        Self {
            gateway,
            compositor,
            settings,
            store: Mutex::new(store),
        }
    }

    pub const fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Handle a new top-level prompt.
    ///
    /// The user message stays in history even when the gateway fails.
    pub async fn handle_prompt(&self, prompt_text: &str) -> Result<PromptOutcome, OrchestratorError> {
        let prompt = prompt_text.trim();
        if prompt.is_empty() {
            return Err(OrchestratorError::EmptyPrompt);
        }

        let mut store = self.store.lock().await;
        store.append_message(MessageRole::User, prompt);

        let request = TextCompletionRequest {
            messages: self.text_context(&store),
            options: self.options_for(&self.settings.text_model),
        };
        let completion = self.gateway.complete_text(request).await.map_err(|e| {
            warn!(model = %self.settings.text_model, error = %e, "Text completion failed");
            e
        })?;

        let reply = completion.content.trim();
        if reply.is_empty() {
            warn!(model = %completion.model, "Text completion returned an empty reply");
            return Err(OrchestratorError::EmptyModelResponse);
        }

        store.append_message(MessageRole::Assistant, reply);
        store.record_top_level_exchange(prompt, reply);
        info!(
            model = %completion.model,
            history_len = store.len(),
            "Prompt handled"
        );

        Ok(PromptOutcome {
            model_used: completion.model.clone(),
            response: reply.to_string(),
        })
    }

    /// Continue the last reply, at most `MAX_CONTINUATIONS` times per prompt.
    pub async fn handle_continue(&self) -> Result<ContinueOutcome, OrchestratorError> {
        let mut store = self.store.lock().await;
        let continuation_prompt = format!("{CONTINUE_PREFIX}{}", store.continuation_base()?);

        store.append_message(MessageRole::User, continuation_prompt);

        let request = TextCompletionRequest {
            messages: self.text_context(&store),
            options: self.options_for(&self.settings.text_model),
        };
        let completion = self.gateway.complete_text(request).await.map_err(|e| {
            warn!(model = %self.settings.text_model, error = %e, "Continuation failed");
            e
        })?;

        let reply = completion.content.trim();
        if reply.is_empty() {
            warn!(model = %completion.model, "Continuation returned an empty reply");
            return Err(OrchestratorError::EmptyModelResponse);
        }

        store.append_message(MessageRole::Assistant, reply);
        let continue_count = store.record_continuation(reply)?;
        info!(continue_count, history_len = store.len(), "Continuation handled");

        Ok(ContinueOutcome {
            continue_count,
            response: reply.to_string(),
        })
    }

    /// Analyze up to `MAX_IMAGES` uploaded images.
    ///
    /// Input errors are raised before touching the conversation. Once the
    /// images are accepted the exchange is always recorded: on failure the
    /// assistant message is the rendered failure text.
    pub async fn handle_analyze_image(
        &self,
        prompt_text: &str,
        images: Vec<ImageUpload>,
    ) -> Result<AnalysisOutcome, OrchestratorError> {
        validate_uploads(&images)?;

        let prompt = match prompt_text.trim() {
            "" => DEFAULT_VISION_PROMPT.to_string(),
            trimmed => trimmed.to_string(),
        };
        let artifact_name = artifact_name(&images);
        let image_count = images.len();
        let encoded = self
            .compose(images.into_iter().map(|image| image.bytes).collect())
            .await;

        let mut store = self.store.lock().await;
        let result = if is_valid_image_payload(&encoded) {
            debug!(
                image_count,
                encoded_len = encoded.len(),
                "Images composed for vision request"
            );
            self.request_vision(&store, &prompt, encoded).await
        } else {
            warn!(image_count, "Image composition produced no usable data");
            Err(OrchestratorError::InvalidOrEmptyImageData)
        };

        let recorded_reply = match &result {
            Ok(reply) => reply.clone(),
            Err(err) => self.render_vision_failure(err),
        };
        store.append_message(MessageRole::User, prompt.as_str());
        store.append_message(MessageRole::Assistant, recorded_reply);
        info!(
            image_count,
            succeeded = result.is_ok(),
            history_len = store.len(),
            "Image analysis handled"
        );

        result.map(|response| AnalysisOutcome {
            response,
            artifact_name,
        })
    }

    /// Snapshot of the conversation for read-only endpoints.
    pub async fn conversation(&self) -> ConversationSnapshot {
        let store = self.store.lock().await;
        ConversationSnapshot {
            messages: store.snapshot_history(),
            continue_count: store.continue_count(),
            can_continue: store.can_continue(),
            last_user_prompt: store.last_user_prompt().map(str::to_string),
            last_assistant_reply: store.last_assistant_reply().map(str::to_string),
        }
    }

    async fn request_vision(
        &self,
        store: &ConversationStore,
        prompt: &str,
        encoded_image: String,
    ) -> Result<String, OrchestratorError> {
        let mut messages = vec![ChatMessage::system(self.settings.vision_system_prompt.as_str())];
        if self.settings.vision_includes_history {
            messages.extend(store.snapshot_history());
        }

        let request = VisionCompletionRequest {
            prompt: prompt.to_string(),
            encoded_image,
            messages,
            options: self.options_for(&self.settings.vision_model),
        };
        let completion = self.gateway.complete_vision(request).await.map_err(|e| {
            warn!(model = %self.settings.vision_model, error = %e, "Vision completion failed");
            e
        })?;

        let reply = completion.content.trim();
        if reply.is_empty() {
            return Err(OrchestratorError::EmptyModelResponse);
        }
        Ok(reply.to_string())
    }

    /// Run the compositor off the async runtime.
    async fn compose(&self, payloads: Vec<Vec<u8>>) -> String {
        let compositor = Arc::clone(&self.compositor);
        match tokio::task::spawn_blocking(move || compositor.compose_base64(&payloads)).await {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "Image composition task failed");
                String::new()
            }
        }
    }

    fn text_context(&self, store: &ConversationStore) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(store.len() + 1);
        messages.push(ChatMessage::system(self.settings.system_prompt.as_str()));
        messages.extend(store.snapshot_history());
        messages
    }

    fn options_for(&self, model: &str) -> CompletionOptions {
        CompletionOptions {
            model: model.to_string(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    fn render_vision_failure(&self, err: &OrchestratorError) -> String {
        match err {
            OrchestratorError::Gateway(gateway_err) => render_gateway_failure(
                CompletionKind::Vision,
                &self.settings.vision_model,
                gateway_err,
            ),
            OrchestratorError::InvalidOrEmptyImageData => INVALID_IMAGE_DATA_REPLY.to_string(),
            other => format!("[Vision Error] {other}"),
        }
    }
}

fn validate_uploads(images: &[ImageUpload]) -> Result<(), OrchestratorError> {
    if images.is_empty() {
        return Err(OrchestratorError::NoImagesProvided);
    }
    if images.len() > MAX_IMAGES {
        return Err(OrchestratorError::TooManyImages {
            count: images.len(),
            max: MAX_IMAGES,
        });
    }
    if let Some(bad) = images.iter().find(|image| !image.is_image()) {
        return Err(OrchestratorError::InvalidImageType {
            file_name: bad.file_name.clone().unwrap_or_else(|| "<unnamed>".into()),
            content_type: bad
                .content_type
                .clone()
                .unwrap_or_else(|| "<missing>".into()),
        });
    }
    Ok(())
}

fn is_valid_image_payload(encoded: &str) -> bool {
    !encoded.is_empty() && BASE64.decode(encoded).is_ok()
}

/// A single upload keeps its own name; several are named after the composite.
fn artifact_name(images: &[ImageUpload]) -> String {
    match images {
        [single] => single
            .file_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "image.png".to_string()),
        many => format!("combined_{}_images.png", many.len()),
    }
}
