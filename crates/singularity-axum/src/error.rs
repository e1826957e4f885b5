//! Axum-specific error types and mappings.
//!
//! Maps `OrchestratorError` to HTTP status codes and a stable JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use singularity_core::{GatewayError, OrchestratorError};
use thiserror::Error;
use tracing::debug;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Malformed request (bad JSON, broken multipart).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request content rejected by the orchestrator.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        error_type: &'static str,
        metadata: Option<serde_json::Value>,
    },

    /// Upload exceeded the body limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Uploaded images could not be composed.
    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    /// Upstream model failed or answered with nothing.
    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        error_type: &'static str,
        metadata: Option<serde_json::Value>,
    },

    /// Upstream model did not answer in time.
    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
    /// Stable error type discriminant for client-side handling
    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    error_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<serde_json::Value>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message, error_type, metadata) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None, None),
            Self::InvalidInput {
                message,
                error_type,
                metadata,
            } => (StatusCode::BAD_REQUEST, message, Some(error_type), metadata),
            Self::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                msg,
                Some("PAYLOAD_TOO_LARGE"),
                None,
            ),
            Self::InvalidImageData(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                msg,
                Some("INVALID_IMAGE_DATA"),
                None,
            ),
            Self::Upstream {
                message,
                error_type,
                metadata,
            } => (StatusCode::BAD_GATEWAY, message, Some(error_type), metadata),
            Self::UpstreamTimeout(msg) => (
                StatusCode::GATEWAY_TIMEOUT,
                msg,
                Some("GATEWAY_TIMEOUT"),
                None,
            ),
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
            error_type,
            metadata,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<OrchestratorError> for HttpError {
    fn from(err: OrchestratorError) -> Self {
        let message = err.to_string();
        if err.is_client_error() {
            debug!(error = %message, "Rejected request input");
        }
        match err {
            OrchestratorError::EmptyPrompt => invalid_input(message, "EMPTY_PROMPT", None),
            OrchestratorError::NoImagesProvided => invalid_input(message, "NO_IMAGES", None),
            OrchestratorError::InvalidImageType { .. } => {
                invalid_input(message, "INVALID_IMAGE_TYPE", None)
            }
            OrchestratorError::TooManyImages { count, max } => invalid_input(
                message,
                "TOO_MANY_IMAGES",
                Some(serde_json::json!({ "count": count, "max": max })),
            ),
            // Handlers answer these with 200; mapped for completeness
            OrchestratorError::ContinuationLimitReached { .. } | OrchestratorError::NoPriorReply => {
                invalid_input(message, "CONTINUATION_NOT_ALLOWED", None)
            }
            OrchestratorError::InvalidOrEmptyImageData => Self::InvalidImageData(message),
            OrchestratorError::EmptyModelResponse => Self::Upstream {
                message,
                error_type: "EMPTY_MODEL_RESPONSE",
                metadata: None,
            },
            OrchestratorError::Gateway(gateway_err) => gateway_err.into(),
        }
    }
}

impl From<GatewayError> for HttpError {
    fn from(err: GatewayError) -> Self {
        if matches!(err, GatewayError::Timeout { .. }) {
            return Self::UpstreamTimeout(err.to_string());
        }

        let mut metadata = serde_json::json!({ "retryable": err.is_retryable() });
        if let GatewayError::Api { status, .. } = &err {
            metadata["upstreamStatus"] = serde_json::json!(status);
        }
        Self::Upstream {
            message: err.to_string(),
            error_type: "GATEWAY_ERROR",
            metadata: Some(metadata),
        }
    }
}

fn invalid_input(
    message: String,
    error_type: &'static str,
    metadata: Option<serde_json::Value>,
) -> HttpError {
    HttpError::InvalidInput {
        message,
        error_type,
        metadata,
    }
}
