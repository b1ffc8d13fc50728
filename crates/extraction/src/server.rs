use std::sync::Arc;

use crate::{
    error::Result,
    http_client::http_client,
    prompt::PromptTemplate,
    provider::{TextGenerator, ollama::OllamaGenerator},
    reconcile::reconcile,
    types::{ExtractionRequest, ExtractionResponse},
};

/// Field-extraction pipeline: render, generate, reconcile
///
/// Holds no per-request state; one instance serves all requests
/// concurrently.
pub struct Server {
    generator: Arc<dyn TextGenerator>,
    template: PromptTemplate,
}

impl Server {
    /// Assemble the pipeline around an injected generation backend
    pub fn new(generator: Arc<dyn TextGenerator>, template: PromptTemplate) -> Self {
        Self { generator, template }
    }

    /// Extract values for every requested field
    ///
    /// A backend failure or malformed completion fails the whole request;
    /// there is no partial result and no retry.
    pub async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionResponse> {
        let prompt = self.template.render(request);

        tracing::debug!(
            backend = self.generator.name(),
            fields = request.fields.len(),
            has_document_text = request.document_text.is_some(),
            "rendered extraction prompt"
        );

        let completion = self.generator.generate(&prompt).await?;
        let extracted_fields = reconcile(&completion, request.field_names())?;

        tracing::debug!(fields = extracted_fields.len(), "extraction complete");

        Ok(ExtractionResponse { extracted_fields })
    }
}

/// Builder for constructing the extraction server from configuration
pub(crate) struct ExtractionServerBuilder<'a> {
    config: &'a formscribe_config::Config,
}

impl<'a> ExtractionServerBuilder<'a> {
    pub fn new(config: &'a formscribe_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> anyhow::Result<Server> {
        let extraction = &self.config.extraction;

        let client = http_client(extraction.request_timeout()?)
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

        let generator = OllamaGenerator::new(
            client,
            &extraction.base_url,
            extraction.model.clone(),
            extraction.temperature,
        );

        let template = PromptTemplate::load(&extraction.prompt_template);

        tracing::debug!(
            base_url = %extraction.base_url,
            model = %extraction.model,
            "extraction server initialized"
        );

        Ok(Server::new(Arc::new(generator), template))
    }
}
