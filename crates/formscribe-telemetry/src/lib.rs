//! Logging and trace export for the formscribe gateways
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter`, a stdout
//! fmt layer (text or JSON), and, when an OTLP exporter is configured, a
//! `tracing-opentelemetry` layer exporting spans.

mod metadata;

use formscribe_config::TelemetryConfig;
use formscribe_config::telemetry::{ExportProtocol, ExporterConfig, LogFormat};
use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider};

/// Guard that flushes and shuts down span export on drop
///
/// Must be held for the lifetime of the process.
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown tracer provider: {e}");
        }
    }
}

/// Initialize logging and optional span export
///
/// `log_filter` is an `EnvFilter` directive string such as `info` or
/// `extraction=debug,info`. `service` names the gateway being run and is
/// appended to the configured service name.
///
/// # Errors
///
/// Returns an error if the OTLP exporter cannot be built or a global
/// subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str, service: &str) -> anyhow::Result<TelemetryGuard> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_new(log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let format = config.map_or(LogFormat::Text, |c| c.log_format);

    let tracer_provider = match config {
        Some(telemetry) => match telemetry.exporter.as_ref() {
            Some(exporter) => Some(init_tracer(telemetry, exporter, service)?),
            None => None,
        },
        None => None,
    };

    let otel_layer = tracer_provider.as_ref().map(|provider| {
        global::set_tracer_provider(provider.clone());
        tracing_opentelemetry::layer().with_tracer(provider.tracer("formscribe"))
    });

    let (text_layer, json_layer) = match format {
        LogFormat::Text => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            ),
            None,
        ),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json().with_target(true))),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .with(otel_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(TelemetryGuard { tracer_provider })
}

/// Build the OTLP tracer provider with the configured sampler
fn init_tracer(config: &TelemetryConfig, exporter: &ExporterConfig, service: &str) -> anyhow::Result<SdkTracerProvider> {
    let exporter = build_span_exporter(exporter)?;

    let sampling_rate = config.tracing.as_ref().map_or(1.0, |t| t.sampling_rate);

    let sampler = if sampling_rate >= 1.0 {
        Sampler::AlwaysOn
    } else if sampling_rate <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(sampling_rate)
    };

    let sampler = if config.tracing.as_ref().is_none_or(|t| t.parent_based) {
        Sampler::ParentBased(Box::new(sampler))
    } else {
        sampler
    };

    Ok(SdkTracerProvider::builder()
        .with_resource(metadata::build_resource(config, service))
        .with_sampler(sampler)
        .with_batch_exporter(exporter)
        .build())
}

fn build_span_exporter(config: &ExporterConfig) -> anyhow::Result<opentelemetry_otlp::SpanExporter> {
    use opentelemetry_otlp::SpanExporter;

    let exporter = match config.protocol {
        ExportProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build gRPC span exporter: {e}"))?,
        ExportProtocol::HttpProto => SpanExporter::builder()
            .with_http()
            .with_endpoint(config.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP span exporter: {e}"))?,
    };

    Ok(exporter)
}
