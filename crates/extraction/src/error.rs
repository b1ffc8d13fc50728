use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use formscribe_core::{ErrorBody, HttpError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Field-extraction failures
///
/// Validation problems are the caller's fault and map to 400; everything
/// that goes wrong after the request was accepted maps to 500.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Request body is missing a required field or has the wrong shape
    #[error("Invalid request data: {message}")]
    Validation {
        /// Offending field, e.g. `transcription` or `fields[2].name`
        field: String,
        message: String,
    },

    /// The generation backend could not be reached or returned an error
    #[error("LLM error: {0}")]
    ModelInvocation(String),

    /// The model's completion is not syntactically valid JSON
    #[error("Invalid JSON response from LLM: {raw}. Error: {reason}")]
    MalformedOutput { raw: String, reason: String },
}

impl ExtractionError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Field named by a validation failure
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl HttpError for ExtractionError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::ModelInvocation(_) | Self::MalformedOutput { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::ModelInvocation(_) => "model_invocation_error",
            Self::MalformedOutput { .. } => "malformed_model_output",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for ExtractionError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error_type = self.error_type(), "extraction failed: {self}");
        } else {
            tracing::debug!(error_type = self.error_type(), "rejected extraction request: {self}");
        }

        (status, Json(ErrorBody::from_error(&self))).into_response()
    }
}
