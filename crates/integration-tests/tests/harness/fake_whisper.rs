//! Stand-in whisper.cpp executables for integration tests
//!
//! The scripts understand the same `--model`, `--file` and `--language`
//! arguments the gateway passes and record the audio path they were given
//! so tests can check the file is gone afterwards.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A shell script posing as `whisper-cli`
pub struct FakeWhisper {
    dir: TempDir,
}

impl FakeWhisper {
    /// Script that prints `[<language>]` followed by the audio file contents
    pub fn echo() -> anyhow::Result<Self> {
        Self::with_body(
            r#"printf '  [%s]\n\n' "$language"
cat "$file"
printf '\n'
"#,
        )
    }

    /// Script that fails with a message on stderr
    pub fn failing(message: &str) -> anyhow::Result<Self> {
        Self::with_body(&format!("echo '{message}' >&2\nexit 3\n"))
    }

    fn with_body(body: &str) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let record = dir.path().join("audio-path");

        let script = format!(
            r#"#!/bin/sh
language=""
file=""
while [ $# -gt 0 ]; do
  case "$1" in
    --file) file="$2"; shift 2 ;;
    --language) language="$2"; shift 2 ;;
    *) shift ;;
  esac
done
printf '%s' "$file" > '{record}'
{body}"#,
            record = record.display(),
        );

        let path = dir.path().join("whisper-cli");
        std::fs::write(&path, script)?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;

        Ok(Self { dir })
    }

    /// Path of the executable
    pub fn binary(&self) -> PathBuf {
        self.dir.path().join("whisper-cli")
    }

    /// Audio path passed on the most recent invocation
    pub fn last_audio_path(&self) -> Option<PathBuf> {
        std::fs::read_to_string(self.dir.path().join("audio-path"))
            .ok()
            .map(PathBuf::from)
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}
