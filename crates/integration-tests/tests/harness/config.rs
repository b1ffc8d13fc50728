//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use formscribe_config::{Config, CorsConfig, HealthConfig, ServerConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    ///
    /// The extraction prompt comes from the template shipped in the
    /// repository.
    pub fn new() -> Self {
        let mut config = Config {
            server: ServerConfig {
                listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                health: HealthConfig::default(),
                ..ServerConfig::default()
            },
            ..Config::default()
        };

        config.extraction.prompt_template =
            PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../prompts/extract_fields.txt"));

        Self { config }
    }

    /// Point the extraction backend at a mock Ollama server
    pub fn with_ollama(mut self, base_url: &str) -> Self {
        self.config.extraction.base_url = base_url.parse().expect("valid URL");
        self
    }

    /// Override the generation model name
    pub fn with_model(mut self, model: &str) -> Self {
        self.config.extraction.model = model.to_owned();
        self
    }

    /// Use a custom prompt template file
    pub fn with_prompt_template(mut self, path: &Path) -> Self {
        self.config.extraction.prompt_template = path.to_path_buf();
        self
    }

    /// Point the transcription backend at a whisper executable
    pub fn with_whisper(mut self, binary: &Path) -> Self {
        self.config.transcription.binary = binary.to_path_buf();
        self
    }

    /// Limit the accepted upload size
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.transcription.max_upload_bytes = bytes;
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
