pub(crate) mod whisper_cpp;

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Speech-to-text backend
///
/// Reads the audio file at `audio_path` and returns the recognized text.
/// A `language` of `None` leaves detection to the model.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<String>;

    /// Backend name for logs
    fn name(&self) -> &str;
}
