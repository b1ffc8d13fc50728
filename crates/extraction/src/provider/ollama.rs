use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::TextGenerator;
use crate::error::{ExtractionError, Result};

/// Ollama `/api/generate` backend
pub(crate) struct OllamaGenerator {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl OllamaGenerator {
    pub fn new(client: Client, base_url: &Url, model: String, temperature: f32) -> Self {
        let endpoint = format!("{}/api/generate", base_url.as_str().trim_end_matches('/'));

        Self {
            client,
            endpoint,
            model,
            temperature,
        }
    }
}

/// Wire format for `POST /api/generate`
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    /// Constrains the completion to valid JSON
    format: &'static str,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default = "empty_object")]
    response: String,
}

#[derive(Deserialize)]
struct OllamaErrorBody {
    error: String,
}

fn empty_object() -> String {
    "{}".to_string()
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "sending generation request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(endpoint = %self.endpoint, error = %e, "generation request failed");
                ExtractionError::ModelInvocation(format!("failed to reach Ollama at {}: {e}", self.endpoint))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<OllamaErrorBody>(&error_text).map_or(error_text, |body| body.error);

            tracing::error!(status = %status, "Ollama API error: {message}");

            return Err(ExtractionError::ModelInvocation(format!(
                "Ollama returned {}: {message}",
                status.as_u16()
            )));
        }

        let result: GenerateResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse Ollama response");
            ExtractionError::ModelInvocation(format!("unexpected response from Ollama: {e}"))
        })?;

        tracing::debug!(completion_len = result.response.len(), "generation complete");

        Ok(result.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
