pub(crate) mod ollama;

use async_trait::async_trait;

use crate::error::Result;

/// Text-generation backend
///
/// Implementations send one prompt and return the raw completion text.
/// Any transport or backend failure is reported as
/// [`ExtractionError::ModelInvocation`](crate::ExtractionError::ModelInvocation);
/// callers never retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a JSON-biased completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Backend name for logs
    fn name(&self) -> &str;
}
