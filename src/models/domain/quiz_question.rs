use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const OPTION_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuizQuestion {
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub correct_index: u8, // always in 0..=3
    pub explanation: String,
}

impl GeneratedQuizQuestion {
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index as usize]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratedQuizSet {
    pub questions: Vec<GeneratedQuizQuestion>,
}

/// A structural defect in model output. Question numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizStructureError {
    #[error("Invalid quiz structure: questions array is missing or not an array")]
    MissingQuestions,

    #[error("Invalid quiz structure: questions array is empty")]
    EmptyQuestions,

    #[error("Invalid quiz structure: expected {expected} questions, got {actual}")]
    WrongQuestionCount { expected: usize, actual: usize },

    #[error("Question {0}: prompt is missing or empty")]
    MissingPrompt(usize),

    #[error("Question {0}: must have exactly 4 options")]
    WrongOptionCount(usize),

    #[error("Question {question}: option {option} is empty")]
    EmptyOption { question: usize, option: usize },

    #[error("Question {0}: duplicate options detected")]
    DuplicateOptions(usize),

    #[error("Question {0}: correctIndex must be between 0 and 3")]
    InvalidCorrectIndex(usize),

    #[error("Question {0}: explanation is missing or empty")]
    MissingExplanation(usize),
}

impl GeneratedQuizSet {
    /// Validates a decoded model response and converts it into typed questions.
    ///
    /// Fails on the first violation; nothing is trimmed, padded or reordered.
    pub fn from_json_value(value: &Value, expected_count: usize) -> Result<Self, QuizStructureError> {
        let raw_questions = value
            .get("questions")
            .and_then(Value::as_array)
            .ok_or(QuizStructureError::MissingQuestions)?;

        if raw_questions.is_empty() {
            return Err(QuizStructureError::EmptyQuestions);
        }

        let questions = raw_questions
            .iter()
            .enumerate()
            .map(|(idx, raw)| parse_question(raw, idx + 1))
            .collect::<Result<Vec<_>, _>>()?;

        if questions.len() != expected_count {
            return Err(QuizStructureError::WrongQuestionCount {
                expected: expected_count,
                actual: questions.len(),
            });
        }

        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn parse_question(raw: &Value, number: usize) -> Result<GeneratedQuizQuestion, QuizStructureError> {
    let prompt = non_empty_str(raw.get("prompt")).ok_or(QuizStructureError::MissingPrompt(number))?;

    let raw_options = raw
        .get("options")
        .and_then(Value::as_array)
        .filter(|opts| opts.len() == OPTION_COUNT)
        .ok_or(QuizStructureError::WrongOptionCount(number))?;

    let mut options: Vec<String> = Vec::with_capacity(OPTION_COUNT);
    for (opt_idx, opt) in raw_options.iter().enumerate() {
        let text = non_empty_str(Some(opt)).ok_or(QuizStructureError::EmptyOption {
            question: number,
            option: opt_idx + 1,
        })?;
        options.push(text.to_string());
    }

    let distinct: HashSet<String> = options.iter().map(|o| o.trim().to_lowercase()).collect();
    if distinct.len() != OPTION_COUNT {
        return Err(QuizStructureError::DuplicateOptions(number));
    }

    let correct_index = raw
        .get("correctIndex")
        .and_then(as_whole_number)
        .filter(|idx| (0..OPTION_COUNT as i64).contains(idx))
        .ok_or(QuizStructureError::InvalidCorrectIndex(number))?;

    let explanation = non_empty_str(raw.get("explanation"))
        .ok_or(QuizStructureError::MissingExplanation(number))?;

    let options: [String; OPTION_COUNT] = options
        .try_into()
        .map_err(|_| QuizStructureError::WrongOptionCount(number))?;

    Ok(GeneratedQuizQuestion {
        prompt: prompt.to_string(),
        options,
        correct_index: correct_index as u8,
        explanation: explanation.to_string(),
    })
}

// Accepts 2 and 2.0, rejects 2.5 and "2".
fn as_whole_number(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid_question() -> Value {
        json!({
            "prompt": "What does the mitochondria produce?",
            "options": ["ATP", "DNA", "Glucose", "Oxygen"],
            "correctIndex": 0,
            "explanation": "Mitochondria produce ATP through cellular respiration."
        })
    }

    fn quiz_with(question: Value) -> Value {
        json!({ "questions": [valid_question(), question] })
    }

    #[test]
    fn accepts_well_formed_quiz_and_preserves_order() {
        let mut second = valid_question();
        second["prompt"] = json!("Second?");
        second["correctIndex"] = json!(3);

        let set = GeneratedQuizSet::from_json_value(&quiz_with(second), 2)
            .expect("quiz should validate");

        assert_eq!(set.len(), 2);
        assert_eq!(set.questions[0].correct_option(), "ATP");
        assert_eq!(set.questions[1].prompt, "Second?");
        assert_eq!(set.questions[1].correct_option(), "Oxygen");
    }

    #[test]
    fn rejects_missing_and_empty_question_arrays() {
        assert_eq!(
            GeneratedQuizSet::from_json_value(&json!({ "items": [] }), 1),
            Err(QuizStructureError::MissingQuestions)
        );
        assert_eq!(
            GeneratedQuizSet::from_json_value(&json!({ "questions": [] }), 1),
            Err(QuizStructureError::EmptyQuestions)
        );
    }

    #[test]
    fn rejects_three_options() {
        let mut bad = valid_question();
        bad["options"] = json!(["A", "B", "C"]);

        let err = GeneratedQuizSet::from_json_value(&quiz_with(bad), 2).unwrap_err();
        assert_eq!(err, QuizStructureError::WrongOptionCount(2));
        assert_eq!(err.to_string(), "Question 2: must have exactly 4 options");
    }

    #[test]
    fn rejects_out_of_range_and_fractional_correct_index() {
        for idx in [json!(5), json!(-1), json!(1.5), json!("1")] {
            let mut bad = valid_question();
            bad["correctIndex"] = idx;

            assert_eq!(
                GeneratedQuizSet::from_json_value(&quiz_with(bad), 2),
                Err(QuizStructureError::InvalidCorrectIndex(2))
            );
        }
    }

    #[test]
    fn accepts_whole_float_correct_index() {
        let mut question = valid_question();
        question["correctIndex"] = json!(2.0);

        let set = GeneratedQuizSet::from_json_value(&json!({ "questions": [question] }), 1)
            .expect("2.0 is a whole number");
        assert_eq!(set.questions[0].correct_index, 2);
    }

    #[test]
    fn rejects_case_insensitive_duplicate_options() {
        let mut bad = valid_question();
        bad["options"] = json!(["ATP", " atp ", "Glucose", "Oxygen"]);

        assert_eq!(
            GeneratedQuizSet::from_json_value(&quiz_with(bad), 2),
            Err(QuizStructureError::DuplicateOptions(2))
        );
    }

    #[test]
    fn rejects_blank_option_prompt_and_explanation() {
        let mut blank_option = valid_question();
        blank_option["options"][2] = json!("   ");
        assert_eq!(
            GeneratedQuizSet::from_json_value(&quiz_with(blank_option), 2),
            Err(QuizStructureError::EmptyOption { question: 2, option: 3 })
        );

        let mut no_prompt = valid_question();
        no_prompt["prompt"] = json!("");
        assert_eq!(
            GeneratedQuizSet::from_json_value(&quiz_with(no_prompt), 2),
            Err(QuizStructureError::MissingPrompt(2))
        );

        let mut no_explanation = valid_question();
        no_explanation.as_object_mut().unwrap().remove("explanation");
        assert_eq!(
            GeneratedQuizSet::from_json_value(&quiz_with(no_explanation), 2),
            Err(QuizStructureError::MissingExplanation(2))
        );
    }

    #[test]
    fn rejects_question_count_mismatch() {
        let quiz = json!({ "questions": [valid_question()] });

        assert_eq!(
            GeneratedQuizSet::from_json_value(&quiz, 3),
            Err(QuizStructureError::WrongQuestionCount { expected: 3, actual: 1 })
        );
    }

    #[test]
    fn serializes_with_camel_case_correct_index() {
        let set = GeneratedQuizSet::from_json_value(&json!({ "questions": [valid_question()] }), 1)
            .expect("quiz should validate");
        let json = serde_json::to_value(&set.questions[0]).expect("question should serialize");

        assert_eq!(json["correctIndex"], 0);
        assert_eq!(json["options"].as_array().map(Vec::len), Some(4));
    }
}
