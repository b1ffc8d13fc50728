use serde::{Deserialize, Serialize};

/// Uploaded audio plus an optional language hint
#[derive(Debug)]
pub struct TranscriptionRequest {
    /// Raw audio bytes, in whatever container the client recorded
    pub audio: Vec<u8>,
    /// Original filename, for logs only
    pub filename: Option<String>,
    /// Language code passed to the model unvalidated; `None` auto-detects
    pub language: Option<String>,
}

/// Transcription result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}
