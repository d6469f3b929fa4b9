//! Analysis gateway: free text in, [`QueryIntent`] out.
//!
//! The user's text is forwarded verbatim to the text generator; the first
//! JSON object in the reply is decoded into an intent.

use std::sync::Arc;

use ai_client::util::{extract_json_object, truncate_to_char_boundary};
use ai_client::{GenerateError, JsonExtractError, TextGenerator};
use thiserror::Error;
use tracing::{debug, warn};

use shoefinder_common::QueryIntent;

/// Sent as the system instruction so the model answers with the intent shape.
pub const INTENT_INSTRUCTION: &str = r#"You turn footwear shopping requests into a JSON object.
Reply with exactly one JSON object and nothing else, using these keys:
  "gender": "m" for men, "f" for women, "k" for kids
  "footwear_type": one of "sport_shoes", "flip_flops", "sandals", "flats", "heels", "school_shoes"
  "color": a single color word, or null
  "subtype": a more specific style such as "running" or "loafers", or null
  "price_range": {"min": number or null, "max": number or null}
Use null for anything the request does not mention."#;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("no text provided")]
    EmptyInput,

    #[error("text generation call failed: {0}")]
    UpstreamCall(#[source] GenerateError),

    #[error("could not read an intent from the model reply: {0}")]
    UpstreamParse(String),
}

impl From<GenerateError> for AnalysisError {
    fn from(e: GenerateError) -> Self {
        if e.is_call_failure() {
            AnalysisError::UpstreamCall(e)
        } else {
            AnalysisError::UpstreamParse(e.to_string())
        }
    }
}

impl From<JsonExtractError> for AnalysisError {
    fn from(e: JsonExtractError) -> Self {
        AnalysisError::UpstreamParse(e.to_string())
    }
}

#[derive(Clone)]
pub struct AnalysisGateway {
    generator: Arc<dyn TextGenerator>,
}

impl AnalysisGateway {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn analyze(&self, text: &str) -> Result<QueryIntent, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let reply = self.generator.generate(text).await?;

        let object = extract_json_object(&reply).inspect_err(|e| {
            warn!(
                error = %e,
                reply = truncate_to_char_boundary(&reply, 500),
                "Model reply held no usable JSON object"
            );
        })?;

        let intent = QueryIntent::from_json(&object);
        debug!(?intent, "Parsed query intent");
        Ok(intent)
    }
}
