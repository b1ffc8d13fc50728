use std::path::Path;

use crate::Config;

/// Routes owned by the gateways themselves
const ENDPOINT_PATHS: [&str; 2] = ["/extract", "/transcribe"];

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, placeholder expansion
    /// fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let config = Self::parse(&raw)?;
        tracing::debug!(path = %path.display(), "configuration loaded");

        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if placeholder expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server_config()?;
        self.validate_extraction_config()?;
        self.validate_transcription_config()?;
        self.validate_telemetry_config()?;
        Ok(())
    }

    fn validate_server_config(&self) -> anyhow::Result<()> {
        if !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        if ENDPOINT_PATHS.contains(&self.server.health.path.as_str()) {
            anyhow::bail!(
                "server.health.path '{}' collides with a service endpoint",
                self.server.health.path
            );
        }

        if let Some(cors) = &self.server.cors
            && cors.credentials
            && [&cors.origins, &cors.methods, &cors.headers].contains(&&crate::AnyOrList::Any)
        {
            anyhow::bail!("server.cors.credentials cannot be combined with wildcard origins, methods or headers");
        }

        Ok(())
    }

    fn validate_extraction_config(&self) -> anyhow::Result<()> {
        let extraction = &self.extraction;

        if extraction.model.trim().is_empty() {
            anyhow::bail!("extraction.model must not be empty");
        }

        if !(0.0..=2.0).contains(&extraction.temperature) {
            anyhow::bail!("extraction.temperature must be between 0.0 and 2.0");
        }

        extraction.request_timeout()?;

        Ok(())
    }

    fn validate_transcription_config(&self) -> anyhow::Result<()> {
        let transcription = &self.transcription;

        if transcription.binary.as_os_str().is_empty() {
            anyhow::bail!("transcription.binary must not be empty");
        }

        if transcription.threads == Some(0) {
            anyhow::bail!("transcription.threads must be greater than 0");
        }

        if transcription.max_upload_bytes == 0 {
            anyhow::bail!("transcription.max_upload_bytes must be greater than 0");
        }

        Ok(())
    }

    fn validate_telemetry_config(&self) -> anyhow::Result<()> {
        let Some(rate) = self
            .telemetry
            .as_ref()
            .and_then(|t| t.tracing.as_ref())
            .map(|t| t.sampling_rate)
        else {
            return Ok(());
        };

        if !(0.0..=1.0).contains(&rate) {
            anyhow::bail!("telemetry.tracing.sampling_rate must be between 0.0 and 1.0");
        }

        Ok(())
    }
}
