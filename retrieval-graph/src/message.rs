//! Conversation messages.
//!
//! Roles: System (prompts built by nodes, never stored in state), User, Assistant.
//! On the wire a message is `{"role": "user", "content": "..."}`; `human` and
//! `ai` are accepted as aliases so chat exports from other tools load as-is.

use serde::{Deserialize, Serialize};

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum Message {
    System(String),
    #[serde(alias = "human")]
    User(String),
    #[serde(alias = "ai")]
    Assistant(String),
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(content.into())
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System(c) | Message::User(c) | Message::Assistant(c) => c,
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Message::System(_) => "system",
            Message::User(_) => "user",
            Message::Assistant(_) => "assistant",
        }
    }
}

/// Content of the most recent user-authored message, if any.
pub fn last_user_message(messages: &[Message]) -> Option<&str> {
    messages.iter().rev().find_map(|m| match m {
        Message::User(c) => Some(c.as_str()),
        _ => None,
    })
}
