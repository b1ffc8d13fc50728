use std::path::PathBuf;

use serde::Deserialize;

/// Speech-to-text backend configuration
///
/// Transcription runs through the whisper.cpp command line tool; the
/// uploaded audio is written to a temporary file that the tool reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptionConfig {
    /// whisper.cpp executable (looked up on `PATH` when not absolute)
    ///
    /// Stock builds only decode WAV, MP3, FLAC and OGG. Browser recordings
    /// (WebM/Opus, the default `audio_suffix`) need a build configured with
    /// `WHISPER_FFMPEG=ON`.
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
    /// ggml model file passed to `--model`
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Worker threads for whisper.cpp; its own default when unset
    #[serde(default)]
    pub threads: Option<u16>,
    /// Extension of the temporary audio file
    ///
    /// whisper.cpp picks its decoder from this extension; `.webm` requires
    /// an ffmpeg-enabled `binary`.
    #[serde(default = "default_audio_suffix")]
    pub audio_suffix: String,
    /// Largest accepted multipart body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            model_path: default_model_path(),
            threads: None,
            audio_suffix: default_audio_suffix(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_binary() -> PathBuf {
    PathBuf::from("whisper-cli")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/ggml-base.bin")
}

fn default_audio_suffix() -> String {
    ".webm".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_upload_bytes() -> usize {
    32 << 20
}
