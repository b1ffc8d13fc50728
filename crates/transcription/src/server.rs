use std::sync::Arc;

use crate::{
    audio_file::ScopedAudioFile,
    error::Result,
    provider::{Transcriber, whisper_cpp::WhisperCppTranscriber},
    types::{TranscriptionRequest, TranscriptionResponse},
};

/// Transcription pipeline: persist the upload, run the model, clean up
pub struct Server {
    transcriber: Arc<dyn Transcriber>,
    audio_suffix: String,
}

impl Server {
    /// Assemble the pipeline around an injected speech backend
    pub fn new(transcriber: Arc<dyn Transcriber>, audio_suffix: impl Into<String>) -> Self {
        Self {
            transcriber,
            audio_suffix: audio_suffix.into(),
        }
    }

    /// Transcribe one upload
    ///
    /// The temporary audio file is gone when this returns, whatever the
    /// outcome.
    pub async fn transcribe(&self, request: TranscriptionRequest) -> Result<TranscriptionResponse> {
        tracing::debug!(
            backend = self.transcriber.name(),
            bytes = request.audio.len(),
            filename = request.filename.as_deref().unwrap_or(""),
            language = request.language.as_deref().unwrap_or("auto"),
            "transcribing upload"
        );

        let audio = ScopedAudioFile::write(request.audio, &self.audio_suffix).await?;

        // On error the file is removed when `audio` drops
        let text = self
            .transcriber
            .transcribe(audio.path(), request.language.as_deref())
            .await?;

        audio.release()?;

        Ok(TranscriptionResponse { text })
    }
}

/// Builder for constructing the transcription server from configuration
pub(crate) struct TranscriptionServerBuilder<'a> {
    config: &'a formscribe_config::Config,
}

impl<'a> TranscriptionServerBuilder<'a> {
    pub fn new(config: &'a formscribe_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> Server {
        let transcription = &self.config.transcription;

        if !transcription.model_path.exists() {
            tracing::warn!(
                model_path = %transcription.model_path.display(),
                "whisper model file not found, transcription requests will fail"
            );
        }

        let transcriber = WhisperCppTranscriber::new(
            transcription.binary.clone(),
            transcription.model_path.clone(),
            transcription.threads,
        );

        tracing::debug!(binary = %transcription.binary.display(), "transcription server initialized");

        Server::new(Arc::new(transcriber), transcription.audio_suffix.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::TranscriptionError;

    /// Reads the audio file it is given and echoes it back as text
    #[derive(Default)]
    struct EchoTranscriber {
        fail: bool,
        seen: Mutex<Vec<(PathBuf, Option<String>)>>,
    }

    #[async_trait]
    impl Transcriber for EchoTranscriber {
        async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((audio_path.to_path_buf(), language.map(str::to_string)));

            if self.fail {
                return Err(TranscriptionError::Failed("model crashed".to_string()));
            }

            Ok(String::from_utf8_lossy(&std::fs::read(audio_path).unwrap()).into_owned())
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn upload(language: Option<&str>) -> TranscriptionRequest {
        TranscriptionRequest {
            audio: b"hello world".to_vec(),
            filename: Some("recording.webm".to_string()),
            language: language.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn returns_model_text_and_removes_file() {
        let transcriber = Arc::new(EchoTranscriber::default());
        let server = Server::new(transcriber.clone(), ".webm");

        let response = server.transcribe(upload(Some("en"))).await.unwrap();
        assert_eq!(response.text, "hello world");

        let seen = transcriber.seen.lock().unwrap();
        let (path, language) = &seen[0];
        assert_eq!(language.as_deref(), Some("en"));
        assert!(path.to_string_lossy().ends_with(".webm"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn removes_file_when_model_fails() {
        let transcriber = Arc::new(EchoTranscriber {
            fail: true,
            ..EchoTranscriber::default()
        });
        let server = Server::new(transcriber.clone(), ".webm");

        let err = server.transcribe(upload(None)).await.unwrap_err();
        assert_eq!(err.to_string(), "Transcription failed: model crashed");

        let seen = transcriber.seen.lock().unwrap();
        let (path, language) = &seen[0];
        assert!(language.is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn each_request_gets_its_own_file() {
        let transcriber = Arc::new(EchoTranscriber::default());
        let server = Server::new(transcriber.clone(), ".webm");

        let (a, b) = tokio::join!(server.transcribe(upload(None)), server.transcribe(upload(None)));
        assert!(a.is_ok() && b.is_ok());

        let seen = transcriber.seen.lock().unwrap();
        assert_ne!(seen[0].0, seen[1].0);
    }
}
