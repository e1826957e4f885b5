//! Conversation request and response DTOs.

use serde::{Deserialize, Serialize};
use singularity_core::{
    AnalysisOutcome, ChatMessage, ContinueOutcome, ConversationSnapshot, PromptOutcome,
};

/// Body of `POST /prompt`.
///
/// A missing `prompt` is treated as empty and rejected by the orchestrator.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptResponse {
    pub model_used: String,
    pub response: String,
}

impl From<PromptOutcome> for PromptResponse {
    fn from(outcome: PromptOutcome) -> Self {
        Self {
            model_used: outcome.model_used,
            response: outcome.response,
        }
    }
}

/// Body of `GET /continue`: either a continuation or a soft refusal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ContinueResponse {
    Continued {
        continued: bool,
        continue_count: u32,
        response: String,
    },
    Refused {
        error: String,
    },
}

impl From<ContinueOutcome> for ContinueResponse {
    fn from(outcome: ContinueOutcome) -> Self {
        Self::Continued {
            continued: true,
            continue_count: outcome.continue_count,
            response: outcome.response,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyzeImageResponse {
    pub response: String,
    /// Name of the (possibly composed) image sent upstream.
    pub filename: String,
}

impl From<AnalysisOutcome> for AnalyzeImageResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self {
            response: outcome.response,
            filename: outcome.artifact_name,
        }
    }
}

/// One history entry, flattened to text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryMessageDto {
    pub role: String,
    pub content: String,
}

impl From<&ChatMessage> for HistoryMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.to_plain_text(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryResponse {
    pub messages: Vec<HistoryMessageDto>,
    pub continue_count: u32,
    pub can_continue: bool,
    pub last_user_prompt: Option<String>,
}

impl From<ConversationSnapshot> for HistoryResponse {
    fn from(snapshot: ConversationSnapshot) -> Self {
        Self {
            messages: snapshot.messages.iter().map(HistoryMessageDto::from).collect(),
            continue_count: snapshot.continue_count,
            can_continue: snapshot.can_continue,
            last_user_prompt: snapshot.last_user_prompt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn continue_response_shapes() {
        let continued = ContinueResponse::from(ContinueOutcome {
            continue_count: 1,
            response: "more".into(),
        });
        assert_eq!(
            serde_json::to_value(&continued).unwrap(),
            json!({"continued": true, "continue_count": 1, "response": "more"})
        );

        let refused = ContinueResponse::Refused {
            error: "No previous reply to continue from".into(),
        };
        assert_eq!(
            serde_json::to_value(&refused).unwrap(),
            json!({"error": "No previous reply to continue from"})
        );
    }

    #[test]
    fn prompt_request_tolerates_missing_field() {
        let req: PromptRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.prompt.is_empty());
    }

    #[test]
    fn history_flattens_messages() {
        let response = HistoryResponse::from(ConversationSnapshot {
            messages: vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")],
            continue_count: 0,
            can_continue: true,
            last_user_prompt: Some("hi".into()),
            last_assistant_reply: Some("hello".into()),
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"}
                ],
                "continue_count": 0,
                "can_continue": true,
                "last_user_prompt": "hi"
            })
        );
    }
}
