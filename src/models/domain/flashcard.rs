use serde::{Deserialize, Serialize};

pub const STUB_EXPLANATION: &str = "Short explanation (stub).";

/// Explanation used when the source text carries no rationale.
pub const NO_EXPLANATION: &str = "-";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratedFlashcard {
    pub front: String,
    pub back: String,
    pub explanation: String,
}

impl GeneratedFlashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            explanation: explanation.into(),
        }
    }

    /// A card taken verbatim from already structured text.
    pub fn ungrounded(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self::new(front, back, NO_EXPLANATION)
    }

    /// Placeholder card for 1-based position `number`.
    pub fn stub(number: usize) -> Self {
        Self::new(
            format!("Question {}", number),
            format!("Answer {}", number),
            STUB_EXPLANATION,
        )
    }
}

/// Placeholder cards numbered `first_number..first_number + count`.
pub fn stub_cards(first_number: usize, count: usize) -> Vec<GeneratedFlashcard> {
    (first_number..first_number + count)
        .map(GeneratedFlashcard::stub)
        .collect()
}
