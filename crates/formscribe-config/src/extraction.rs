use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use url::Url;

/// Field-extraction backend configuration (an Ollama server)
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Ollama base URL
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Model name passed to `/api/generate`
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature; kept low for structured output
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Prompt template file; the built-in template is used when it is missing
    #[serde(default = "default_prompt_template")]
    pub prompt_template: PathBuf,
    /// Transport timeout for one generation call (e.g. "120s", "2m")
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
}

impl ExtractionConfig {
    /// Parsed `request_timeout`
    ///
    /// # Errors
    ///
    /// Returns an error if the duration string cannot be parsed
    pub fn request_timeout(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.request_timeout)
            .map_err(|e| anyhow::anyhow!("invalid extraction.request_timeout '{}': {e}", self.request_timeout))
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            prompt_template: default_prompt_template(),
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("http://localhost:11434").expect("must be a valid URL")
}

fn default_model() -> String {
    "mistral".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_temperature() -> f32 {
    0.1
}

fn default_prompt_template() -> PathBuf {
    PathBuf::from("prompts/extract_fields.txt")
}

fn default_request_timeout() -> String {
    "120s".to_string()
}
