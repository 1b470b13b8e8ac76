use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reply appended in place of an assistant answer when a turn fails
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One chat message within a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

/// Append-only conversation tagged with the session generation it belongs to.
///
/// Replies carry the generation they were issued under and are only appended
/// while it still matches.
#[derive(Debug, Default)]
pub(crate) struct Transcript {
    pub generation: u64,
    pub messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Clear the conversation for a new session and return its generation
    pub fn reset(&mut self) -> u64 {
        self.generation += 1;
        self.messages.clear();
        self.generation
    }

    /// Invalidate the current generation without clearing messages
    pub fn close(&mut self) {
        self.generation += 1;
    }

    pub fn user_turns(&self) -> usize {
        self.messages.iter().filter(|m| m.is_user()).count()
    }
}
