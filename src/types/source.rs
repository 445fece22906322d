use serde::{Deserialize, Serialize};

/// A backend-ranked question/answer pair returned alongside a chat answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    /// The matched question.
    pub question: String,

    /// The stored answer for the matched question.
    pub answer: String,

    /// Similarity between the asked and the matched question, in `[0, 1]`.
    pub relevance_score: f64,
}

impl Source {
    /// The relevance score as displayed to the user (four decimal places).
    pub fn display_score(&self) -> String {
        format!("{:.4}", self.relevance_score)
    }
}
