use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

use crate::analysis::AnalysisError;

/// Handler failures. Client errors carry their message to the caller;
/// upstream and database detail is logged and replaced with a generic body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No text provided")]
    MissingText,

    #[error("Invalid gender or footwear type provided")]
    UnresolvedTable,

    #[error("Invalid gender provided. Use \"m\" or \"f\".")]
    InvalidGender,

    #[error("Text analysis failed")]
    Upstream(#[source] AnalysisError),

    #[error("Database query failed")]
    Database(#[source] anyhow::Error),
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::EmptyInput => ApiError::MissingText,
            other => ApiError::Upstream(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingText | ApiError::UnresolvedTable | ApiError::InvalidGender => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Upstream(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Upstream(e) => error!(error = %e, "Text analysis failed"),
            ApiError::Database(e) => error!(error = ?e, "Database query failed"),
            _ => {}
        }

        (
            self.status(),
            Json(serde_json::json!({"error": self.to_string()})),
        )
            .into_response()
    }
}
