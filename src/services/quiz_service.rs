use std::sync::Arc;

use serde_json::Value;

use crate::{
    config::QuizLimits,
    constants::quiz_prompt::quiz_generation_prompt,
    errors::{AppError, AppResult},
    models::{
        domain::{GeneratedQuizSet, PromptRequest},
        dto::request::GenerateQuizRequest,
    },
    services::{gateway::TextGenerationGateway, json_helpers::strip_fences},
};

pub const QUIZ_UNAVAILABLE_MESSAGE: &str =
    "Unable to generate quiz at this time. Please try again later.";

const MAX_RECOMMENDED_PROMPT_CHARS: usize = 1000;

/// Generates multiple-choice quizzes. Unlike flashcards there is no fallback:
/// bad input, a failed model call or malformed output all surface as errors.
pub struct QuizService {
    gateway: Arc<TextGenerationGateway>,
    limits: QuizLimits,
}

impl QuizService {
    pub fn new(gateway: Arc<TextGenerationGateway>, limits: QuizLimits) -> Self {
        Self { gateway, limits }
    }

    pub async fn generate_quiz(&self, request: GenerateQuizRequest) -> AppResult<GeneratedQuizSet> {
        let text = request.text.trim();
        let question_count = request.question_count;
        self.validate_input(text, question_count)?;

        let prompt = quiz_generation_prompt(question_count, text);

        let raw = self
            .gateway
            .generate(&PromptRequest::new(prompt))
            .await
            .map_err(|err| {
                log::error!("quiz: model call failed: {}", err);
                AppError::from_gateway(err, QUIZ_UNAVAILABLE_MESSAGE)
            })?;

        let quiz = parse_quiz(&raw, question_count as usize).map_err(|cause| {
            log::error!("quiz: rejecting model output: {}", cause);
            AppError::generation(QUIZ_UNAVAILABLE_MESSAGE, cause)
        })?;

        for (idx, question) in quiz.questions.iter().enumerate() {
            if question.prompt.chars().count() > MAX_RECOMMENDED_PROMPT_CHARS {
                log::warn!(
                    "quiz: question {} prompt is {} chars, above the recommended {}",
                    idx + 1,
                    question.prompt.chars().count(),
                    MAX_RECOMMENDED_PROMPT_CHARS
                );
            }
        }

        log::info!("quiz: generated {} questions", quiz.len());
        Ok(quiz)
    }

    /// Rejects requests the model should never see. Bounds are stated in the message.
    fn validate_input(&self, text: &str, question_count: u32) -> AppResult<()> {
        let limits = &self.limits;

        if text.is_empty() {
            return Err(AppError::ValidationError(
                "Text content is required for quiz generation.".to_string(),
            ));
        }

        if question_count < limits.min_question_count || question_count > limits.max_question_count {
            return Err(AppError::ValidationError(format!(
                "Question count must be between {} and {}.",
                limits.min_question_count, limits.max_question_count
            )));
        }

        let length = text.chars().count();
        let min_required = (question_count as usize).saturating_mul(limits.min_chars_per_question);
        if length < min_required {
            return Err(AppError::ValidationError(format!(
                "Text too short for {} questions. Need at least {} characters, got {}.",
                question_count, min_required, length
            )));
        }

        if length > limits.max_text_length {
            return Err(AppError::ValidationError(format!(
                "Text is too long (maximum {} characters).",
                limits.max_text_length
            )));
        }

        Ok(())
    }
}

/// Fence-stripped output must decode as JSON on its own; no span scanning.
fn parse_quiz(raw: &str, expected_count: usize) -> Result<GeneratedQuizSet, String> {
    let cleaned = strip_fences(raw);

    let value: Value = serde_json::from_str(&cleaned).map_err(|e| {
        let head: String = cleaned.chars().take(200).collect();
        log::debug!("quiz: unparseable response head: {:?}", head);
        format!("AI returned invalid JSON format: {}", e)
    })?;

    GeneratedQuizSet::from_json_value(&value, expected_count).map_err(|e| e.to_string())
}
