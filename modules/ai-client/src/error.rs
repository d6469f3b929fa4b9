use reqwest::header::InvalidHeaderValue;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid API key header: {0}")]
    Header(#[from] InvalidHeaderValue),

    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The call succeeded but the envelope carried no generated text.
    #[error("no text in {0} response")]
    EmptyResponse(&'static str),
}

impl GenerateError {
    /// True when the upstream call itself failed (network, auth, non-2xx),
    /// as opposed to a reply we could not read.
    pub fn is_call_failure(&self) -> bool {
        !matches!(self, GenerateError::EmptyResponse(_))
    }
}

#[derive(Error, Debug)]
pub enum JsonExtractError {
    #[error("no JSON object in response")]
    NotFound,

    #[error("malformed JSON object in response: {0}")]
    Malformed(#[source] serde_json::Error),
}
