use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;

use crate::{
    errors::GatewayError,
    models::domain::PromptRequest,
    services::model_service::TextGenerator,
};

pub mod fixtures {
    use serde_json::json;

    /// Plain study prose with no Q/A markers, long enough for several quiz questions.
    pub const PROSE_TEXT: &str = "Photosynthesis is the process by which green plants use sunlight to \
        synthesize nutrients from carbon dioxide and water. It takes place mainly in the \
        chloroplasts of leaf cells, where the pigment chlorophyll absorbs light energy. \
        The light-dependent reactions split water molecules and release oxygen as a by-product, \
        while the Calvin cycle fixes carbon dioxide into sugars. Cellular respiration later \
        breaks those sugars down in the mitochondria to release usable energy in the form of ATP. \
        Together these two processes form the backbone of the energy flow through most ecosystems, \
        linking producers, consumers and decomposers in a continuous cycle of matter and energy.";

    pub const QA_TEXT: &str = "Q: What is photosynthesis?\n\
        A: The conversion of light energy into chemical energy\n\
        Q: Where does it happen?\n\
        A: In the chloroplasts\n\
        Q: What gas is released?\n\
        A: Oxygen";

    /// A well-formed `{"cards": [...]}` response with `n` model cards.
    pub fn cards_json(n: usize) -> String {
        let cards: Vec<_> = (1..=n)
            .map(|i| {
                json!({
                    "front": format!("Model front {}", i),
                    "back": format!("Model back {}", i),
                    "explanation": format!("Model explanation {}", i),
                })
            })
            .collect();
        json!({ "cards": cards }).to_string()
    }

    /// A well-formed quiz question numbered `i`.
    pub fn quiz_question(i: usize) -> serde_json::Value {
        json!({
            "prompt": format!("Question {} about photosynthesis?", i),
            "options": [
                format!("Chloroplast {}", i),
                format!("Mitochondrion {}", i),
                format!("Nucleus {}", i),
                format!("Ribosome {}", i),
            ],
            "correctIndex": i % 4,
            "explanation": "Photosynthesis happens in chloroplasts.",
        })
    }

    /// A well-formed quiz response with `n` questions.
    pub fn quiz_json(n: usize) -> String {
        let questions: Vec<_> = (1..=n).map(quiz_question).collect();
        json!({ "questions": questions }).to_string()
    }
}

/// Replays queued results in order and records every prompt it receives.
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, GatewayError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &PromptRequest) -> Result<String, GatewayError> {
        self.prompts
            .lock()
            .unwrap()
            .push(request.prompt_text().to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::transport(None, "no scripted response left")))
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_fixture_prose_has_no_qa_markers() {
        assert!(crate::services::qa_parser::parse_qa_pairs(PROSE_TEXT).is_empty());
        assert!(PROSE_TEXT.len() > 500);
    }

    #[test]
    fn test_fixture_quiz_json_is_valid() {
        let value: serde_json::Value = serde_json::from_str(&quiz_json(3)).unwrap();
        let set = crate::models::domain::GeneratedQuizSet::from_json_value(&value, 3).unwrap();
        assert_eq!(set.len(), 3);
    }

    #[tokio::test]
    async fn test_scripted_generator_replays_in_order() {
        let generator = ScriptedGenerator::new(vec![Ok("one".into()), Ok("two".into())]);

        assert_eq!(generator.generate(&PromptRequest::new("a")).await.unwrap(), "one");
        assert_eq!(generator.generate(&PromptRequest::new("b")).await.unwrap(), "two");
        assert!(generator.generate(&PromptRequest::new("c")).await.is_err());
        assert_eq!(generator.prompts(), vec!["a", "b", "c"]);
    }
}
