use serde::{Deserialize, Serialize};

/// One entry of the chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// The message text.
    pub text: String,

    /// True when the user typed the message, false for chatbot output.
    pub is_user: bool,
}

impl ChatMessage {
    /// A message typed by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
        }
    }

    /// A message produced by the chatbot (or on its behalf).
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
        }
    }
}
