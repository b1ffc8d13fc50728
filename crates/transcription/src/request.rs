use axum::{
    body::Body,
    extract::{FromRequest, Multipart, Query, multipart::Field},
    http::{Request, header},
};
use serde::Deserialize;

use crate::{error::TranscriptionError, types::TranscriptionRequest};

/// Multipart part carrying the audio bytes
const AUDIO_FIELD: &str = "audio_file";

/// Extractor for the `multipart/form-data` transcription upload
///
/// Expects an `audio_file` part and an optional `language` part; other
/// parts are skipped. `?language=` in the query string is also honored,
/// with the form part taking precedence. Rejections carry the usual
/// `{"detail": ...}` body.
pub struct AudioUpload(pub TranscriptionRequest);

#[derive(Debug, Default, Deserialize)]
struct LanguageQuery {
    language: Option<String>,
}

impl<S> FromRequest<S> for AudioUpload
where
    S: Send + Sync,
{
    type Rejection = TranscriptionError;

    async fn from_request(request: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("multipart/form-data") {
            return Err(TranscriptionError::InvalidUpload(
                "expected 'Content-Type: multipart/form-data'".to_string(),
            ));
        }

        let query_language = Query::<LanguageQuery>::try_from_uri(request.uri())
            .map_err(|e| TranscriptionError::InvalidUpload(format!("invalid query string: {e}")))?
            .0
            .language
            .map(|language| language.trim().to_string())
            .filter(|language| !language.is_empty());

        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| TranscriptionError::InvalidUpload(format!("failed to parse multipart form: {e}")))?;

        let mut audio = None;
        let mut filename = None;
        let mut language = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| TranscriptionError::InvalidUpload(format!("failed to read multipart form: {e}")))?
        {
            match field.name().unwrap_or("") {
                AUDIO_FIELD => {
                    filename = field.file_name().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| TranscriptionError::InvalidUpload(format!("failed to read audio data: {e}")))?;
                    audio = Some(bytes.to_vec());
                }
                "language" => {
                    language = read_text(field, "language").await?;
                }
                _ => {}
            }
        }

        let audio = audio.ok_or_else(|| {
            TranscriptionError::InvalidUpload(format!("missing required '{AUDIO_FIELD}' field in multipart form"))
        })?;

        Ok(Self(TranscriptionRequest {
            audio,
            filename,
            language: language.or(query_language),
        }))
    }
}

/// Read a text part; blank values count as absent
async fn read_text(field: Field<'_>, name: &str) -> Result<Option<String>, TranscriptionError> {
    let text = field
        .text()
        .await
        .map_err(|e| TranscriptionError::InvalidUpload(format!("failed to read {name} field: {e}")))?;

    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}
