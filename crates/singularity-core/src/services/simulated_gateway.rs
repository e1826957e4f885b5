//! Offline model gateway.
//!
//! Answers without network access so the service can run without an API
//! key. Text replies echo the prompt under a label picked by
//! [`classify_prompt`].

use async_trait::async_trait;

use crate::domain::chat::MessageRole;
use crate::domain::classifier::classify_prompt;
use crate::ports::{
    Completion, GatewayError, ModelGateway, TextCompletionRequest, VisionCompletionRequest,
};

const SIMULATED_VISION_MODEL: &str = "Vision (Simulated)";

/// A [`ModelGateway`] that never leaves the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedGateway;

impl SimulatedGateway {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModelGateway for SimulatedGateway {
    async fn complete_text(
        &self,
        request: TextCompletionRequest,
    ) -> Result<Completion, GatewayError> {
        let prompt = request
            .messages
            .iter()
            .rev()
            .find(|message| message.role == MessageRole::User)
            .map(|message| message.content.to_plain_text())
            .ok_or_else(|| GatewayError::InvalidResponse {
                message: "no user message to respond to".into(),
            })?;

        let model = classify_prompt(&prompt);
        Ok(Completion {
            model: model.to_string(),
            content: format!("[{model}] Response to: \"{}\"", prompt.trim()),
        })
    }

    async fn complete_vision(
        &self,
        request: VisionCompletionRequest,
    ) -> Result<Completion, GatewayError> {
        Ok(Completion {
            model: SIMULATED_VISION_MODEL.to_string(),
            content: format!(
                "[{SIMULATED_VISION_MODEL}] Received {} bytes of encoded image for: \"{}\"",
                request.encoded_image.len(),
                request.prompt.trim()
            ),
        })
    }
}
