/// A single prompt submitted to the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptRequest {
    prompt_text: String,
    expects_json: bool,
}

impl PromptRequest {
    /// A prompt whose answer is expected to be a JSON document.
    pub fn new(prompt_text: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            expects_json: true,
        }
    }

    /// A prompt whose answer is free-form prose.
    pub fn plain_text(prompt_text: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            expects_json: false,
        }
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    pub fn expects_json(&self) -> bool {
        self.expects_json
    }
}
