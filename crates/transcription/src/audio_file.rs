use std::{io::Write, path::Path};

use tempfile::NamedTempFile;

use crate::error::{Result, TranscriptionError};

/// Uploaded audio persisted for the speech model to read
///
/// The file gets a unique name so concurrent requests never collide. It is
/// removed by [`ScopedAudioFile::release`] on success and by `Drop` on
/// every other exit path, including errors and cancelled requests.
pub(crate) struct ScopedAudioFile {
    file: NamedTempFile,
}

impl ScopedAudioFile {
    /// Write `audio` to a new temporary file ending in `suffix`
    pub async fn write(audio: Vec<u8>, suffix: &str) -> Result<Self> {
        let suffix = suffix.to_string();

        tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
            let mut file = tempfile::Builder::new().prefix("formscribe-").suffix(&suffix).tempfile()?;
            file.write_all(&audio)?;
            file.flush()?;
            Ok(file)
        })
        .await
        .map_err(|e| TranscriptionError::Resource(format!("audio write task failed: {e}")))?
        .map(|file| Self { file })
        .map_err(|e| TranscriptionError::Resource(format!("failed to write temporary audio file: {e}")))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Remove the file, reporting a failed removal
    pub fn release(self) -> Result<()> {
        self.file
            .close()
            .map_err(|e| TranscriptionError::Resource(format!("failed to remove temporary audio file: {e}")))
    }
}
