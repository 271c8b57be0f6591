use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::i18n::Locale;
use crate::relay::RelayError;
use crate::storage::{StagingError, UploadError};
use crate::submission::parser::ParseError;
use crate::submission::validation::ValidationResult;

/// Terminal failure of one submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Bad request: {0}")]
    Parse(#[from] ParseError),
    #[error("Validation failed: {}", .0.failed_fields().join(", "))]
    Validation(ValidationResult),
    #[error("Staging failed: {0}")]
    Staging(#[from] StagingError),
    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),
    #[error("Relay failed: {0}")]
    Relay(#[from] RelayError),
}

impl SubmitError {
    pub fn status(&self) -> StatusCode {
        match self {
            SubmitError::Parse(_) | SubmitError::Validation(_) => StatusCode::BAD_REQUEST,
            SubmitError::Staging(_) | SubmitError::Upload(_) | SubmitError::Relay(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Build the client response. Upstream detail is logged, never returned.
    pub fn into_response_for(self, locale: Locale) -> Response {
        let messages = locale.messages();
        let status = self.status();

        let body = match &self {
            SubmitError::Parse(err) => {
                tracing::warn!("Rejected malformed submission: {err}");
                json!({ "error": err.to_string() })
            }
            SubmitError::Validation(result) => {
                tracing::warn!(fields = ?result.failed_fields(), "Submission failed validation");
                json!({ "error": messages.invalid_fields, "errors": result.errors() })
            }
            SubmitError::Staging(err) => {
                tracing::error!("Staging error: {err}");
                json!({ "error": messages.upload_failed })
            }
            SubmitError::Upload(err) => {
                tracing::error!("Upload error: {err}");
                json!({ "error": messages.upload_failed })
            }
            SubmitError::Relay(err) => {
                tracing::error!("Relay error: {err}");
                json!({ "error": messages.connection_error })
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
