//! Provider-agnostic conversation model types.
//!
//! ```rust
//! use gprovider::{ChatRequest, ConversationTurn, TurnRole};
//!
//! let request = ChatRequest::new("You are a door guard.", "Are you lying?")
//!     .with_history(vec![ConversationTurn::new(TurnRole::User, "Hello")]);
//!
//! assert_eq!(request.history.len(), 1);
//! assert_eq!(request.user_message, "Are you lying?");
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// One role-tagged message in a conversation, in the normalized shape
/// exchanged with adapters. Never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A normalized completion request: the persona system prompt, the prior
/// turns in order, and the newest user message carried separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub system_prompt: String,
    pub history: Vec<ConversationTurn>,
    pub user_message: String,
}

impl ChatRequest {
    pub fn new(system_prompt: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            history: Vec::new(),
            user_message: user_message.into(),
        }
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }
}
