use std::{env, str::FromStr, time::Duration};

use secrecy::SecretString;

use crate::models::domain::GenerationMode;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Which wire protocol the live gateway speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    OpenAi,
}

impl LlmProvider {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "openai" | "open_ai" | "openai-compatible" => LlmProvider::OpenAi,
            _ => LlmProvider::Gemini,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => DEFAULT_GEMINI_BASE_URL,
            LlmProvider::OpenAi => DEFAULT_OPENAI_BASE_URL,
        }
    }
}

/// Bounds applied to quiz requests before the model is called.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizLimits {
    pub min_question_count: u32,
    pub max_question_count: u32,
    pub min_chars_per_question: usize,
    pub max_text_length: usize,
}

impl Default for QuizLimits {
    fn default() -> Self {
        Self {
            min_question_count: 1,
            max_question_count: 20,
            min_chars_per_question: 50,
            max_text_length: 100_000,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub generation_mode: GenerationMode,
    pub llm_provider: LlmProvider,
    pub api_key: Option<SecretString>,
    pub model_name: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub max_output_tokens: u32,
    pub quiz_limits: QuizLimits,
    pub max_text_length: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. `from_env` is this over the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let llm_provider = lookup("LLM_PROVIDER")
            .map(|p| LlmProvider::parse(&p))
            .unwrap_or(LlmProvider::Gemini);
        let defaults = QuizLimits::default();
        let max_text_length = parse_or(&lookup, "TEXT_MAX_LENGTH", defaults.max_text_length);

        Self {
            generation_mode: lookup("LLM_MODE")
                .map(|m| GenerationMode::parse(&m))
                .unwrap_or_default(),
            llm_provider,
            api_key: lookup("GEMINI_API_KEY")
                .filter(|k| !k.trim().is_empty())
                .map(SecretString::from),
            model_name: lookup("GEMINI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "gemini-2.5-flash".to_string()),
            api_base_url: lookup("LLM_API_BASE")
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| llm_provider.default_base_url().to_string()),
            request_timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", 30),
            max_attempts: parse_or(&lookup, "LLM_MAX_ATTEMPTS", 3u32).max(1),
            retry_base_delay_ms: parse_or(&lookup, "LLM_RETRY_BASE_DELAY_MS", 1000),
            max_output_tokens: parse_or(&lookup, "LLM_MAX_OUTPUT_TOKENS", 1200),
            quiz_limits: QuizLimits {
                min_question_count: parse_or(&lookup, "QUIZ_MIN_QUESTIONS", defaults.min_question_count),
                max_question_count: parse_or(&lookup, "QUIZ_MAX_QUESTIONS", defaults.max_question_count),
                min_chars_per_question: parse_or(
                    &lookup,
                    "QUIZ_MIN_CHARS_PER_QUESTION",
                    defaults.min_chars_per_question,
                ),
                max_text_length,
            },
            max_text_length,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Live mode without a credential still starts; every generation call will
    /// fail with a configuration error until the key is supplied.
    pub fn missing_live_credential(&self) -> bool {
        self.generation_mode == GenerationMode::Live && self.api_key.is_none()
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            generation_mode: GenerationMode::Stub,
            llm_provider: LlmProvider::Gemini,
            api_key: None,
            model_name: "gemini-test".to_string(),
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 30,
            max_attempts: 3,
            retry_base_delay_ms: 1000,
            max_output_tokens: 1200,
            quiz_limits: QuizLimits::default(),
            max_text_length: 100_000,
        }
    }
}

/// Parses `key` straight into the target type. Missing, malformed and
/// out-of-range values all yield `default`.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
