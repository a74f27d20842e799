use std::sync::Arc;

use crate::{
    constants::prompts::{summary_prompt, MAX_SUMMARY_CHARS, MIN_SUMMARY_INPUT_CHARS},
    errors::{AppError, AppResult},
    models::domain::PromptRequest,
    services::gateway::TextGenerationGateway,
};

pub const SUMMARY_UNAVAILABLE_MESSAGE: &str =
    "Unable to generate summary at this time. Please try again later.";

pub struct SummaryService {
    gateway: Arc<TextGenerationGateway>,
    max_text_length: usize,
}

impl SummaryService {
    pub fn new(gateway: Arc<TextGenerationGateway>, max_text_length: usize) -> Self {
        Self {
            gateway,
            max_text_length,
        }
    }

    pub async fn generate_summary(&self, text: &str) -> AppResult<String> {
        let text = text.trim();
        self.validate_input(text)?;

        let raw = self
            .gateway
            .generate(&PromptRequest::plain_text(summary_prompt(text)))
            .await
            .map_err(|err| {
                log::error!("summary: model call failed: {}", err);
                AppError::from_gateway(err, SUMMARY_UNAVAILABLE_MESSAGE)
            })?;

        let summary = raw.trim();
        if summary.is_empty() {
            log::error!("summary: model returned an empty response");
            return Err(AppError::generation(
                SUMMARY_UNAVAILABLE_MESSAGE,
                "Failed to generate summary. Please try again.",
            ));
        }

        Ok(truncate_at_word(summary, MAX_SUMMARY_CHARS))
    }

    fn validate_input(&self, text: &str) -> AppResult<()> {
        if text.is_empty() {
            return Err(AppError::ValidationError(
                "Text content is required for summary generation.".to_string(),
            ));
        }

        let length = text.chars().count();
        if length < MIN_SUMMARY_INPUT_CHARS {
            return Err(AppError::ValidationError(format!(
                "Text is too short to generate a meaningful summary (minimum {} characters).",
                MIN_SUMMARY_INPUT_CHARS
            )));
        }
        if length > self.max_text_length {
            return Err(AppError::ValidationError(format!(
                "Text is too long (maximum {} characters).",
                self.max_text_length
            )));
        }
        Ok(())
    }
}

/// Cuts `text` to at most `max_chars` characters, backing off to the last space
/// inside the limit when there is one.
fn truncate_at_word(text: &str, max_chars: usize) -> String {
    let cut = match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => return text.to_string(),
    };

    match cut.rfind(' ') {
        Some(space) if space > 0 => cut[..space].to_string(),
        _ => cut.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        errors::GatewayError,
        models::domain::GenerationMode,
        services::{
            gateway::GatewaySettings,
            model_service::{MockTextGenerator, TextGenerator},
            retry_policy::RetryPolicy,
        },
        test_utils::{fixtures, ScriptedGenerator},
    };

    fn service(mode: GenerationMode, generator: Option<Arc<dyn TextGenerator>>) -> SummaryService {
        let gateway = TextGenerationGateway::new(
            mode,
            generator,
            GatewaySettings {
                model_name: "gemini-test".to_string(),
                timeout: Duration::from_secs(30),
                retry: RetryPolicy::default(),
            },
        );
        SummaryService::new(Arc::new(gateway), 100_000)
    }

    #[tokio::test]
    async fn returns_trimmed_summary_and_asks_for_plain_text() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .withf(|req: &PromptRequest| !req.expects_json() && req.prompt_text().contains("Text to summarize:"))
            .times(1)
            .returning(|_| Ok("  Plants turn light into sugar.\n".to_string()));

        let summary = service(GenerationMode::Live, Some(Arc::new(mock)))
            .generate_summary(fixtures::PROSE_TEXT)
            .await
            .unwrap();

        assert_eq!(summary, "Plants turn light into sugar.");
    }

    #[tokio::test]
    async fn long_summary_is_cut_at_a_word_boundary() {
        let long = "word ".repeat(1200);
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(long)]));

        let summary = service(GenerationMode::Live, Some(generator))
            .generate_summary(fixtures::PROSE_TEXT)
            .await
            .unwrap();

        assert!(summary.chars().count() <= MAX_SUMMARY_CHARS);
        assert!(summary.ends_with("word"));
    }

    #[tokio::test]
    async fn rejects_short_text_without_calling_the_model() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate().never();

        let err = service(GenerationMode::Live, Some(Arc::new(mock)))
            .generate_summary("too short")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(err.to_string().contains("minimum 100 characters"));
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let err = service(GenerationMode::Stub, None)
            .generate_summary("   ")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Validation error: Text content is required for summary generation."
        );
    }

    #[tokio::test]
    async fn empty_model_output_is_a_failure() {
        let err = service(GenerationMode::Stub, None)
            .generate_summary(fixtures::PROSE_TEXT)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), SUMMARY_UNAVAILABLE_MESSAGE);
        assert_eq!(err.cause(), "Failed to generate summary. Please try again.");
    }

    #[tokio::test]
    async fn missing_credential_is_not_masked() {
        let err = service(GenerationMode::Live, None)
            .generate_summary(fixtures::PROSE_TEXT)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ConfigurationError(_)));
    }

    #[tokio::test]
    async fn other_failures_use_the_generic_message() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Err(GatewayError::transport(
            Some(403),
            "403 permission denied",
        ))]));

        let err = service(GenerationMode::Live, Some(generator))
            .generate_summary(fixtures::PROSE_TEXT)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), SUMMARY_UNAVAILABLE_MESSAGE);
        assert!(err.cause().contains("403"));
    }

    #[test]
    fn truncate_at_word_handles_edge_cases() {
        assert_eq!(truncate_at_word("short", 10), "short");
        assert_eq!(truncate_at_word("alpha beta gamma", 12), "alpha beta");
        assert_eq!(truncate_at_word("abcdefghij", 4), "abcd");
        assert_eq!(truncate_at_word("ééé ééé", 5), "ééé");
    }
}
