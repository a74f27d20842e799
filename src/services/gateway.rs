use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    errors::GatewayError,
    models::domain::{GenerationMode, PromptRequest},
    services::{
        model_service::{build_generator, TextGenerator},
        retry_policy::{RetryPolicy, RetryableErrorClass},
    },
};

pub const CREDENTIAL_ENV: &str = "GEMINI_API_KEY";
const PREVIEW_CHARS: usize = 200;

#[derive(Clone, Debug)]
pub struct GatewaySettings {
    pub model_name: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl From<&Config> for GatewaySettings {
    fn from(config: &Config) -> Self {
        Self {
            model_name: config.model_name.clone(),
            timeout: config.request_timeout(),
            retry: RetryPolicy {
                max_attempts: config.max_attempts,
                base_delay: config.retry_base_delay(),
            },
        }
    }
}

/// The only path to the external generator.
///
/// In stub mode every call returns an empty string without touching the
/// generator. In live mode each attempt races the generator against the
/// configured timeout; transient failures are retried with exponential backoff.
pub struct TextGenerationGateway {
    mode: GenerationMode,
    generator: Option<Arc<dyn TextGenerator>>,
    settings: GatewaySettings,
}

impl TextGenerationGateway {
    pub fn new(
        mode: GenerationMode,
        generator: Option<Arc<dyn TextGenerator>>,
        settings: GatewaySettings,
    ) -> Self {
        Self {
            mode,
            generator,
            settings,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.generation_mode,
            build_generator(config),
            GatewaySettings::from(config),
        )
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn model_name(&self) -> &str {
        &self.settings.model_name
    }

    pub async fn generate(&self, request: &PromptRequest) -> Result<String, GatewayError> {
        if self.mode.is_stub() {
            log::debug!("gateway mode=stub: skipping model call");
            return Ok(String::new());
        }

        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| GatewayError::MissingCredential(CREDENTIAL_ENV.to_string()))?;

        let max_attempts = self.settings.retry.max_attempts.max(1);
        let mut last_error: Option<GatewayError> = None;

        for attempt in 0..max_attempts {
            log::info!(
                "gateway request mode={} model={} attempt={}/{} prompt_len={}",
                self.mode,
                self.settings.model_name,
                attempt + 1,
                max_attempts,
                request.prompt_text().len()
            );

            // Dropping the timed-out future abandons the attempt; a late reply is never observed.
            let outcome = match tokio::time::timeout(self.settings.timeout, generator.generate(request)).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout(self.settings.timeout)),
            };

            let err = match outcome {
                Ok(text) => {
                    log::info!(
                        "gateway response model={} attempt={} response_len={} preview={:?}",
                        self.settings.model_name,
                        attempt + 1,
                        text.len(),
                        preview(&text, PREVIEW_CHARS)
                    );
                    return Ok(text);
                }
                Err(err) => err,
            };

            let class = RetryableErrorClass::of(&err);
            if !class.is_retryable() {
                log::error!(
                    "gateway attempt {}/{} failed with non-retryable error: {}",
                    attempt + 1,
                    max_attempts,
                    err
                );
                return Err(err);
            }

            log::warn!(
                "gateway attempt {}/{} failed ({:?}): {}",
                attempt + 1,
                max_attempts,
                class,
                err
            );
            last_error = Some(err);

            if attempt + 1 < max_attempts {
                tokio::time::sleep(self.settings.retry.delay_after(attempt)).await;
            }
        }

        let last_error = last_error.map(|e| e.detail()).unwrap_or_default();
        log::error!(
            "gateway giving up after {} attempts: {}",
            max_attempts,
            last_error
        );
        Err(GatewayError::RetriesExhausted {
            attempts: max_attempts,
            last_error,
        })
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
