use std::sync::Arc;

use crate::{
    constants::prompts::{assistant_prompt, MAX_ASSISTANT_RESPONSE_CHARS},
    errors::{AppError, AppResult},
    models::domain::PromptRequest,
    services::gateway::TextGenerationGateway,
};

pub const NO_RESPONSE: &str = "No response generated.";
const ASSISTANT_UNAVAILABLE_MESSAGE: &str =
    "Unable to answer at this time. Please try again later.";

/// Free-form study questions answered in plain text.
pub struct StudyAssistantService {
    gateway: Arc<TextGenerationGateway>,
}

impl StudyAssistantService {
    pub fn new(gateway: Arc<TextGenerationGateway>) -> Self {
        Self { gateway }
    }

    pub async fn respond(&self, prompt: &str) -> AppResult<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(NO_RESPONSE.to_string());
        }

        let raw = self
            .gateway
            .generate(&PromptRequest::plain_text(assistant_prompt(prompt)))
            .await
            .map_err(|err| {
                log::error!("assistant: model call failed: {}", err);
                AppError::from_gateway(err, ASSISTANT_UNAVAILABLE_MESSAGE)
            })?;

        let answer = raw.trim();
        if answer.is_empty() {
            return Ok(NO_RESPONSE.to_string());
        }

        match answer.char_indices().nth(MAX_ASSISTANT_RESPONSE_CHARS) {
            Some((byte_idx, _)) => Ok(answer[..byte_idx].trim_end().to_string()),
            None => Ok(answer.to_string()),
        }
    }
}
