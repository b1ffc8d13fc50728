use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use formscribe_core::{ErrorBody, HttpError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TranscriptionError>;

/// Transcription failures
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// Multipart body is missing `audio_file` or cannot be read
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// Writing or removing the temporary audio file failed
    #[error("Transcription failed: {0}")]
    Resource(String),

    /// The speech model could not be run or reported an error
    #[error("Transcription failed: {0}")]
    Failed(String),
}

impl HttpError for TranscriptionError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            Self::Resource(_) | Self::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidUpload(_) => "invalid_upload",
            Self::Resource(_) => "resource_error",
            Self::Failed(_) => "transcription_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for TranscriptionError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error_type = self.error_type(), "{self}");
        } else {
            tracing::debug!(error_type = self.error_type(), "rejected transcription request: {self}");
        }

        (status, Json(ErrorBody::from_error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_problems_are_client_errors() {
        let err = TranscriptionError::InvalidUpload("missing 'audio_file' field".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn resource_and_model_failures_share_prefix() {
        let resource = TranscriptionError::Resource("disk full".to_string());
        let failed = TranscriptionError::Failed("whisper-cli exited with status 1".to_string());

        assert_eq!(resource.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resource.client_message(), "Transcription failed: disk full");
        assert!(failed.client_message().starts_with("Transcription failed: "));
    }
}
