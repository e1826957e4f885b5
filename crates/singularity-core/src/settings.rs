//! Orchestrator settings and validation.
//!
//! These are pure domain types with no infrastructure dependencies. The
//! binary fills them from the environment; see `singularity-cli`.

use serde::{Deserialize, Serialize};

/// Default upstream model for both text and vision requests.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default completion token budget.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default number of messages retained in the conversation history.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// System prompt prepended to every text request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Singularity, a warm and helpful AI tutor with deep knowledge of science, math, and humanities.
You explain clearly and step-by-step, using a friendly tone and numbered structure when helpful.
You are patient, supportive, and curious. You never make the user feel dumb.
Your answers are optimized for clarity and usefulness, not exceeding 1000 tokens.";

/// System prompt prepended to every vision request.
pub const DEFAULT_VISION_SYSTEM_PROMPT: &str =
    "You are a visual reasoning tutor AI. Describe and explain what you see.";

/// Settings governing how the orchestrator talks to the model gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorSettings {
    /// Model used for prompt and continuation requests.
    pub text_model: String,

    /// Model used for image analysis requests.
    pub vision_model: String,

    /// Sampling temperature (0.0-2.0).
    pub temperature: f32,

    /// Completion token budget (1-16384).
    pub max_tokens: u32,

    /// Maximum number of messages kept in history (>= 2).
    pub history_limit: usize,

    pub system_prompt: String,

    pub vision_system_prompt: String,

    /// Whether vision requests carry the conversation history as context.
    pub vision_includes_history: bool,
}

impl OrchestratorSettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            text_model: DEFAULT_MODEL.to_string(),
            vision_model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            vision_system_prompt: DEFAULT_VISION_SYSTEM_PROMPT.to_string(),
            vision_includes_history: true,
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),

    #[error("Max tokens must be between 1 and 16,384, got {0}")]
    InvalidMaxTokens(u32),

    #[error("History limit must be at least 2 messages, got {0}")]
    InvalidHistoryLimit(usize),

    #[error("Model identifier cannot be empty")]
    EmptyModel,
}

/// Validate settings values.
pub fn validate_settings(settings: &OrchestratorSettings) -> Result<(), SettingsError> {
    if !(0.0..=2.0).contains(&settings.temperature) {
        return Err(SettingsError::InvalidTemperature(settings.temperature));
    }

    if !(1..=16_384).contains(&settings.max_tokens) {
        return Err(SettingsError::InvalidMaxTokens(settings.max_tokens));
    }

    // One user/assistant pair must always fit
    if settings.history_limit < 2 {
        return Err(SettingsError::InvalidHistoryLimit(settings.history_limit));
    }

    if settings.text_model.trim().is_empty() || settings.vision_model.trim().is_empty() {
        return Err(SettingsError::EmptyModel);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = OrchestratorSettings::with_defaults();
        assert_eq!(settings.text_model, "gpt-4o");
        assert_eq!(settings.vision_model, "gpt-4o");
        assert_eq!(settings.max_tokens, 1000);
        assert_eq!(settings.history_limit, DEFAULT_HISTORY_LIMIT);
        assert!(settings.vision_includes_history);
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_validate_temperature_out_of_range() {
        let settings = OrchestratorSettings {
            temperature: 2.5,
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn test_validate_max_tokens_zero() {
        let settings = OrchestratorSettings {
            max_tokens: 0,
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidMaxTokens(0))
        ));
    }

    #[test]
    fn test_validate_history_limit_too_small() {
        let settings = OrchestratorSettings {
            history_limit: 1,
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidHistoryLimit(1))
        ));
    }

    #[test]
    fn test_validate_empty_model() {
        let settings = OrchestratorSettings {
            vision_model: "  ".into(),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::EmptyModel)
        ));
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let settings: OrchestratorSettings =
            serde_json::from_str(r#"{"text_model": "gpt-4o-mini"}"#).unwrap();
        assert_eq!(settings.text_model, "gpt-4o-mini");
        assert_eq!(settings.vision_model, DEFAULT_MODEL);
        assert_eq!(settings.history_limit, DEFAULT_HISTORY_LIMIT);
    }
}
