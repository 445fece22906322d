use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A stored question/answer record.
///
/// The backend owns these records; the client only ever holds a copy of the
/// page it last fetched.  Timestamps are read-only and are never sent back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QaPair {
    /// Backend-assigned identifier.
    pub id: u64,

    /// The question text.
    pub question: String,

    /// The answer text.
    pub answer: String,

    /// When the record was created.
    #[serde(default, skip_serializing, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,

    /// When the record was last modified.
    #[serde(default, skip_serializing, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl QaPair {
    /// Create a new `QaPair` without timestamps.
    pub fn new(id: u64, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Payload for creating a question/answer record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewQaPair {
    /// The question text.
    pub question: String,

    /// The answer text.
    pub answer: String,
}

impl NewQaPair {
    /// Create a new `NewQaPair`.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}
