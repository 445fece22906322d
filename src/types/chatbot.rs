use serde::{Deserialize, Serialize};

use crate::types::Source;

/// Body of a chatbot question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatbotQuestion {
    /// The question to answer.
    pub question: String,
}

/// The chatbot's answer and the sources it was ranked from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatbotReply {
    /// The answer text.
    pub answer: String,

    /// Ranked sources, best first.
    #[serde(default)]
    pub sources: Vec<Source>,
}
