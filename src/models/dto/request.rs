use serde::Deserialize;
use validator::Validate;

pub const MIN_FLASHCARD_COUNT: u32 = 1;
pub const MAX_FLASHCARD_COUNT: u32 = 30;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateFlashcardsRequest {
    /// Length is bounded by `Config::max_text_length`, checked by the service.
    pub text: String,

    #[validate(range(min = 1, max = 30, message = "Flashcard count must be between 1 and 30."))]
    pub count: u32,
}

impl GenerateFlashcardsRequest {
    pub fn new(text: impl Into<String>, count: u32) -> Self {
        Self {
            text: text.into(),
            count,
        }
    }
}

/// Quiz bounds are runtime configuration, so they are checked by the quiz
/// service rather than by derive attributes.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateQuizRequest {
    pub text: String,
    #[serde(default = "default_question_count")]
    pub question_count: u32,
}

fn default_question_count() -> u32 {
    10
}

impl GenerateQuizRequest {
    pub fn new(text: impl Into<String>, question_count: u32) -> Self {
        Self {
            text: text.into(),
            question_count,
        }
    }
}
