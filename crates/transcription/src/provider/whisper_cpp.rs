use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::process::Command;

use super::Transcriber;
use crate::error::{Result, TranscriptionError};

/// whisper.cpp command line backend
///
/// Runs one `whisper-cli` process per request. Segment lines printed to
/// stdout form the transcription.
pub(crate) struct WhisperCppTranscriber {
    binary: PathBuf,
    model_path: PathBuf,
    threads: Option<u16>,
}

impl WhisperCppTranscriber {
    pub fn new(binary: PathBuf, model_path: PathBuf, threads: Option<u16>) -> Self {
        Self {
            binary,
            model_path,
            threads,
        }
    }

    fn args(&self, audio_path: &Path, language: Option<&str>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--model".into(),
            self.model_path.clone().into(),
            "--file".into(),
            audio_path.into(),
            "--language".into(),
            language.unwrap_or("auto").into(),
            "--no-timestamps".into(),
            "--no-prints".into(),
        ];

        if let Some(threads) = self.threads {
            args.push("--threads".into());
            args.push(threads.to_string().into());
        }

        args
    }
}

/// Join non-empty stdout lines with single spaces
fn collect_text(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl Transcriber for WhisperCppTranscriber {
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<String> {
        tracing::debug!(
            binary = %self.binary.display(),
            language = language.unwrap_or("auto"),
            "running whisper.cpp"
        );

        let output = Command::new(&self.binary)
            .args(self.args(audio_path, language))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| TranscriptionError::Failed(format!("failed to run {}: {e}", self.binary.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(status = %output.status, "whisper.cpp failed: {}", stderr.trim());

            return Err(TranscriptionError::Failed(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        let text = collect_text(&output.stdout);
        tracing::debug!(text_len = text.len(), "whisper.cpp transcription complete");

        Ok(text)
    }

    fn name(&self) -> &str {
        "whisper.cpp"
    }
}
