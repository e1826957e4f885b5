//! The conversation store: the only stateful component.
//!
//! One store exists per process. It is not internally synchronized; the
//! orchestrator owns it behind a single async mutex.

use std::collections::VecDeque;

use thiserror::Error;

use crate::domain::chat::{ChatMessage, MessageContent, MessageRole};
use crate::settings::DEFAULT_HISTORY_LIMIT;

/// Maximum number of continuations per top-level prompt.
pub const MAX_CONTINUATIONS: u32 = 2;

/// Why a continuation was refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ContinuationNotAllowed {
    #[error("Continuation limit of {limit} reached for this prompt")]
    LimitReached { limit: u32 },

    #[error("No previous reply to continue from")]
    NoPriorReply,
}

/// Running conversation state.
///
/// History is bounded by `history_limit`; appending to a full history
/// evicts the oldest message. Eviction never leaves an assistant reply at
/// the front, so the retained history always opens with a user turn.
#[derive(Debug)]
pub struct ConversationStore {
    history: VecDeque<ChatMessage>,
    history_limit: usize,
    last_user_prompt: Option<String>,
    last_assistant_reply: Option<String>,
    continue_count: u32,
}

impl ConversationStore {
    /// Create an empty store retaining at most `history_limit` messages.
    ///
    /// A limit of zero is treated as one.
    pub fn new(history_limit: usize) -> Self {
        let history_limit = history_limit.max(1);
        Self {
            history: VecDeque::with_capacity(history_limit.min(DEFAULT_HISTORY_LIMIT)),
            history_limit,
            last_user_prompt: None,
            last_assistant_reply: None,
            continue_count: 0,
        }
    }

    /// Append a message, evicting the oldest one if the history is full.
    pub fn append_message(&mut self, role: MessageRole, content: impl Into<MessageContent>) {
        while self.history.len() >= self.history_limit {
            self.history.pop_front();
            // Drop replies whose prompt was just evicted
            while self
                .history
                .front()
                .is_some_and(|message| message.role == MessageRole::Assistant)
            {
                self.history.pop_front();
            }
        }
        self.history.push_back(ChatMessage::new(role, content));
    }

    /// Record a completed top-level prompt and reset the continuation counter.
    pub fn record_top_level_exchange(&mut self, prompt: impl Into<String>, reply: impl Into<String>) {
        self.last_user_prompt = Some(prompt.into());
        self.last_assistant_reply = Some(reply.into());
        self.continue_count = 0;
    }

    /// Check that a continuation is allowed and return the reply to continue from.
    pub fn continuation_base(&self) -> Result<&str, ContinuationNotAllowed> {
        if self.continue_count >= MAX_CONTINUATIONS {
            return Err(ContinuationNotAllowed::LimitReached {
                limit: MAX_CONTINUATIONS,
            });
        }
        match self.last_assistant_reply.as_deref() {
            Some(reply) if !reply.is_empty() => Ok(reply),
            _ => Err(ContinuationNotAllowed::NoPriorReply),
        }
    }

    /// Append a continuation reply to the last reply.
    ///
    /// Returns the new continuation count.
    pub fn record_continuation(&mut self, reply: &str) -> Result<u32, ContinuationNotAllowed> {
        self.continuation_base()?;
        if let Some(last) = self.last_assistant_reply.as_mut() {
            last.push('\n');
            last.push_str(reply);
        }
        self.continue_count += 1;
        Ok(self.continue_count)
    }

    /// Owned copy of the history, oldest first.
    #[must_use]
    pub fn snapshot_history(&self) -> Vec<ChatMessage> {
        self.history.iter().cloned().collect()
    }

    pub const fn continue_count(&self) -> u32 {
        self.continue_count
    }

    pub fn can_continue(&self) -> bool {
        self.continuation_base().is_ok()
    }

    pub fn last_user_prompt(&self) -> Option<&str> {
        self.last_user_prompt.as_deref()
    }

    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.last_assistant_reply.as_deref()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
