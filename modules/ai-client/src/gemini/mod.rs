mod client;
pub(crate) mod types;

use async_trait::async_trait;
use tracing::debug;

use crate::error::GenerateError;
use crate::traits::TextGenerator;
use client::GeminiClient;
use types::GenerateContentRequest;

// =============================================================================
// Gemini Agent
// =============================================================================

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    model: String,
    http: reqwest::Client,
    base_url: Option<String>,
    system_instruction: Option<String>,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            http: reqwest::Client::new(),
            base_url: None,
            system_instruction: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sent as `systemInstruction`; the user prompt stays the sole entry in `contents`.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> GeminiClient {
        let client = GeminiClient::new(&self.api_key, self.http.clone());
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Single-turn generation returning `candidates[0].content.parts[0].text`.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, GenerateError> {
        let mut request = GenerateContentRequest::new(prompt);
        if let Some(ref instruction) = self.system_instruction {
            request = request.system_instruction(instruction.clone());
        }

        let response = self.client().generate_content(&self.model, &request).await?;

        debug!(
            model = %self.model,
            candidates = response.candidates.len(),
            finish_reason = ?response.candidates.first().and_then(|c| c.finish_reason.as_deref()),
            prompt_tokens = ?response.usage_metadata.as_ref().map(|u| u.prompt_token_count),
            output_tokens = ?response.usage_metadata.as_ref().map(|u| u.candidates_token_count),
            "Gemini response"
        );

        response
            .text()
            .map(str::to_string)
            .ok_or(GenerateError::EmptyResponse("Gemini"))
    }
}

#[async_trait]
impl TextGenerator for Gemini {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.generate_content(prompt).await
    }
}
