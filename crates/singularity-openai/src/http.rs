//! HTTP backend abstraction for the chat completions endpoint.
//!
//! The production backend uses reqwest with a bounded timeout. Tests swap
//! in a fake backend that returns canned responses.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::OpenAiClientConfig;
use crate::error::{OpenAiError, OpenAiResult};
use crate::models::{ApiErrorEnvelope, ChatCompletionRequest, ChatCompletionResponse};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for backends that can post a chat completion request.
///
/// This is an implementation detail - external code should use the
/// `ModelGateway` port.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn post_chat(&self, request: &ChatCompletionRequest)
    -> OpenAiResult<ChatCompletionResponse>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production backend using reqwest.
///
/// No retries: a failed request is reported once and mapped at the port.
pub struct ReqwestBackend {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl ReqwestBackend {
    pub fn new(config: &OpenAiClientConfig) -> OpenAiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            url: config.completions_url(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> OpenAiError {
        if err.is_timeout() {
            OpenAiError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            OpenAiError::Network(err)
        }
    }
}

#[async_trait]
impl ChatBackend for ReqwestBackend {
    async fn post_chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> OpenAiResult<ChatCompletionResponse> {
        let api_key = self.api_key.as_deref().ok_or(OpenAiError::MissingApiKey)?;

        debug!(
            url = %self.url,
            model = %request.model,
            message_count = request.messages.len(),
            "Posting chat completion"
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            return Err(OpenAiError::ApiRequestFailed {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body).map_or_else(
        |_| body.trim().to_string(),
        |envelope| envelope.error.message,
    )
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A fake backend that records requests and replays canned results.
    #[derive(Default)]
    pub struct FakeBackend {
        responses: Mutex<VecDeque<OpenAiResult<serde_json::Value>>>,
        requests: Mutex<Vec<serde_json::Value>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a successful JSON response.
        pub fn with_response(self, json: serde_json::Value) -> Self {
            self.responses.lock().unwrap().push_back(Ok(json));
            self
        }

        /// Queue a failure.
        pub fn with_error(self, error: OpenAiError) -> Self {
            self.responses.lock().unwrap().push_back(Err(error));
            self
        }

        /// Requests seen so far, as serialized JSON.
        pub fn requests(&self) -> Vec<serde_json::Value> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn post_chat(
            &self,
            request: &ChatCompletionRequest,
        ) -> OpenAiResult<ChatCompletionResponse> {
            self.requests
                .lock()
                .unwrap()
                .push(serde_json::to_value(request)?);

            let next = self.responses.lock().unwrap().pop_front().ok_or_else(|| {
                OpenAiError::InvalidResponse {
                    message: "no canned response".to_string(),
                }
            })?;
            Ok(serde_json::from_value(next?)?)
        }
    }
}
