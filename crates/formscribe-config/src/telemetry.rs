use serde::Deserialize;
use url::Url;

/// Logging and trace export configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// `service.name` resource attribute
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Output format of the stdout log layer
    #[serde(default)]
    pub log_format: LogFormat,
    /// OTLP span exporter; spans stay local when unset
    #[serde(default)]
    pub exporter: Option<ExporterConfig>,
    /// Sampling configuration for exported spans
    #[serde(default)]
    pub tracing: Option<TracingConfig>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_format: LogFormat::default(),
            exporter: None,
            tracing: None,
        }
    }
}

/// Stdout log format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// OTLP exporter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    /// OTLP endpoint URL
    pub endpoint: Url,
    /// Export protocol
    #[serde(default)]
    pub protocol: ExportProtocol,
}

/// OTLP export protocol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportProtocol {
    /// gRPC (default)
    #[default]
    Grpc,
    /// HTTP/protobuf
    HttpProto,
}

/// Span sampling configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TracingConfig {
    /// Sampling rate (0.0 to 1.0)
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: f64,
    /// Follow the parent span's sampling decision
    #[serde(default = "default_true")]
    pub parent_based: bool,
}

fn default_service_name() -> String {
    "formscribe".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_sampling_rate() -> f64 {
    1.0
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}
