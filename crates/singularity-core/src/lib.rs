#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    ChatMessage, ContentPart, DEFAULT_VISION_PROMPT, ImageUpload, MAX_IMAGES, MessageContent,
    MessageRole, classify_prompt,
};
pub use ports::{
    Completion, CompletionKind, CompletionOptions, GatewayError, ImageCompositorPort,
    ModelGateway, TextCompletionRequest, VisionCompletionRequest, render_gateway_failure,
};
pub use services::{
    AnalysisOutcome, CONTINUE_PREFIX, ChatOrchestrator, ContinuationNotAllowed, ContinueOutcome,
    ConversationSnapshot, ConversationStore, MAX_CONTINUATIONS, OrchestratorError, PromptOutcome,
    SimulatedGateway,
};
pub use settings::{
    DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT,
    DEFAULT_TEMPERATURE, DEFAULT_VISION_SYSTEM_PROMPT, OrchestratorSettings, SettingsError,
    validate_settings,
};

// serde_json is only exercised by serialization tests
#[cfg(test)]
use serde_json as _;
