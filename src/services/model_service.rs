//! Transport adapters for the external text generator. Each adapter performs a
//! single round-trip; timeouts and retries belong to the gateway.

use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    config::{Config, LlmProvider},
    errors::GatewayError,
    models::domain::PromptRequest,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &PromptRequest) -> Result<String, GatewayError>;
}

/// Builds the live adapter for the configured provider, or `None` when no
/// credential is configured.
pub fn build_generator(config: &Config) -> Option<Arc<dyn TextGenerator>> {
    let api_key = config.api_key.clone()?;

    let generator: Arc<dyn TextGenerator> = match config.llm_provider {
        LlmProvider::Gemini => Arc::new(GeminiGenerator::new(
            api_key,
            &config.api_base_url,
            &config.model_name,
            config.max_output_tokens,
        )),
        LlmProvider::OpenAi => Arc::new(OpenAiGenerator::new(
            api_key,
            &config.api_base_url,
            &config.model_name,
            config.max_output_tokens,
        )),
    };
    Some(generator)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiRequestPart<'a>>,
}

#[derive(Serialize)]
struct GeminiRequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GeminiResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Native Gemini `generateContent` over HTTP. The key travels in a header so it
/// never appears in URLs or error messages.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
    max_output_tokens: u32,
}

impl GeminiGenerator {
    pub fn new(api_key: SecretString, base_url: &str, model: &str, max_output_tokens: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: format!(
                "{}/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
            max_output_tokens,
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, request: &PromptRequest) -> Result<String, GatewayError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiRequestPart {
                    text: request.prompt_text(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: 0.0,
                max_output_tokens: self.max_output_tokens,
                response_mime_type: request.expects_json().then_some("application/json"),
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::transport(e.status().map(|s| s.as_u16()), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiErrorEnvelope>(&raw)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(GatewayError::transport(
                Some(status.as_u16()),
                format!("{} {}", status.as_u16(), message),
            ));
        }

        let payload: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::transport(None, format!("Malformed Gemini response body: {}", e)))?;

        Ok(payload.text())
    }
}

/// Any OpenAI-compatible chat completions endpoint.
pub struct OpenAiGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    max_output_tokens: u32,
}

impl OpenAiGenerator {
    pub fn new(api_key: SecretString, base_url: &str, model: &str, max_output_tokens: u32) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(base_url);

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            max_output_tokens,
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, OpenAIError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(0.0)
            .max_completion_tokens(self.max_output_tokens)
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into()])
            .build()?;

        let response = self.client.chat().create(request).await?;
        Ok(response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default())
    }
}

fn map_openai_error(err: OpenAIError) -> GatewayError {
    match err {
        OpenAIError::Reqwest(inner) => {
            GatewayError::transport(inner.status().map(|s| s.as_u16()), inner.to_string())
        }
        other => GatewayError::transport(None, other.to_string()),
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, request: &PromptRequest) -> Result<String, GatewayError> {
        self.complete(request.prompt_text())
            .await
            .map_err(map_openai_error)
    }
}
