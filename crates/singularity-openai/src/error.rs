//! Internal error types for OpenAI operations.
//!
//! These errors are internal to `singularity-openai` and are mapped to
//! `GatewayError` at the port boundary.

use thiserror::Error;

/// Result type alias for OpenAI operations.
pub type OpenAiResult<T> = Result<T, OpenAiError>;

/// Errors related to OpenAI API operations.
#[derive(Debug, Error)]
pub enum OpenAiError {
    /// API request failed with an HTTP error status.
    #[error("OpenAI API request failed with status {status}: {message}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// Upstream error message, or the raw body
        message: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from OpenAI API: {message}")]
    InvalidResponse { message: String },

    /// No API key was configured.
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    /// The request exceeded the configured timeout.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
