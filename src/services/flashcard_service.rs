use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use validator::Validate;

use crate::{
    constants::prompts::{flashcard_prompt, flashcard_repair_prompt},
    errors::{AppError, AppResult, GatewayError},
    models::{
        domain::{
            flashcard::{stub_cards, NO_EXPLANATION},
            GeneratedFlashcard, PromptRequest,
        },
        dto::request::GenerateFlashcardsRequest,
    },
    services::{
        gateway::TextGenerationGateway,
        json_helpers::{extract_json_payload, looks_truncated, JsonPayloadError},
        qa_parser::parse_qa_pairs,
    },
};

/// Reasons the model path gave up. All of them end in stub fallback except
/// a missing credential.
#[derive(Debug, Error)]
enum CardExtractionError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Payload(#[from] JsonPayloadError),

    #[error("Model returned invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model JSON is missing a \"cards\" array")]
    MissingCards,
}

/// Turns study text into exactly `count` flashcards.
///
/// Pre-structured Q/A text is parsed locally. Otherwise the model is asked for
/// cards; whatever it returns is cleaned, cut or padded to `count`, and any
/// failure on that path degrades to placeholder cards.
pub struct FlashcardService {
    gateway: Arc<TextGenerationGateway>,
    max_text_length: usize,
}

impl FlashcardService {
    pub fn new(gateway: Arc<TextGenerationGateway>, max_text_length: usize) -> Self {
        Self {
            gateway,
            max_text_length,
        }
    }

    pub async fn generate_flashcards(
        &self,
        request: GenerateFlashcardsRequest,
    ) -> AppResult<Vec<GeneratedFlashcard>> {
        request.validate()?;

        let count = request.count as usize;
        let text = request.text.trim();

        if text.chars().count() > self.max_text_length {
            return Err(AppError::ValidationError(format!(
                "Text is too long (maximum {} characters).",
                self.max_text_length
            )));
        }

        if text.is_empty() {
            return Ok(stub_cards(1, count));
        }

        let mut parsed = parse_qa_pairs(text);
        if !parsed.is_empty() {
            log::info!(
                "flashcards: parsed {} Q/A pairs from source text (requested {})",
                parsed.len(),
                count
            );
            parsed.truncate(count);
            return Ok(parsed);
        }

        if self.gateway.mode().is_stub() {
            return Ok(stub_cards(1, count));
        }

        match self.cards_from_model(text, count).await {
            Ok(cards) => Ok(reconcile_count(cards, count)),
            Err(CardExtractionError::Gateway(err @ GatewayError::MissingCredential(_))) => {
                Err(AppError::ConfigurationError(err.to_string()))
            }
            Err(err) => {
                log::error!("flashcards: model call/parse failed, using stub cards: {}", err);
                Ok(stub_cards(1, count))
            }
        }
    }

    async fn cards_from_model(
        &self,
        text: &str,
        count: usize,
    ) -> Result<Vec<GeneratedFlashcard>, CardExtractionError> {
        let prompt = flashcard_prompt(count, text);

        let mut raw = self.gateway.generate(&PromptRequest::new(prompt.as_str())).await?;

        if looks_truncated(&raw) {
            log::warn!(
                "flashcards: model response looks truncated ({} chars), asking once more",
                raw.len()
            );
            raw = self
                .gateway
                .generate(&PromptRequest::new(flashcard_repair_prompt(&prompt)))
                .await?;
        }

        let payload = extract_json_payload(&raw)?;
        parse_cards(&payload)
    }
}

fn parse_cards(json_text: &str) -> Result<Vec<GeneratedFlashcard>, CardExtractionError> {
    let parsed: Value = serde_json::from_str(json_text)?;

    let items = match &parsed {
        Value::Array(items) => items,
        other => other
            .get("cards")
            .and_then(Value::as_array)
            .or_else(|| other.get("flashcards").and_then(Value::as_array))
            .ok_or(CardExtractionError::MissingCards)?,
    };

    Ok(items.iter().filter_map(normalize_card).collect())
}

/// Maps one loosely shaped card object onto a flashcard.
///
/// `question`/`answer` stand in for `front`/`back`, `rationale`/`why` for
/// `explanation`. Non-string scalars are stringified. Cards without a front or
/// back are dropped; a missing explanation becomes `"-"`.
pub fn normalize_card(item: &Value) -> Option<GeneratedFlashcard> {
    let front = coerce_field(item, &["front", "question"]);
    let back = coerce_field(item, &["back", "answer"]);
    let explanation = coerce_field(item, &["explanation", "rationale", "why"]);

    if front.is_empty() || back.is_empty() {
        return None;
    }

    let explanation = if explanation.is_empty() {
        NO_EXPLANATION.to_string()
    } else {
        explanation
    };

    Some(GeneratedFlashcard::new(front, back, explanation))
}

// First key that is present and not null wins, even when its value is empty.
fn coerce_field(item: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| item.get(*key))
        .find(|value| !value.is_null())
        .map(|value| match value {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string().trim().to_string(),
        })
        .unwrap_or_default()
}

/// Cuts to `count`, or pads the shortfall with stub cards numbered by position.
pub fn reconcile_count(mut cards: Vec<GeneratedFlashcard>, count: usize) -> Vec<GeneratedFlashcard> {
    if cards.len() >= count {
        cards.truncate(count);
        return cards;
    }

    let shortfall = count - cards.len();
    let next_number = cards.len() + 1;
    cards.extend(stub_cards(next_number, shortfall));
    cards
}
