#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod extraction;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;
pub mod transcription;

use serde::Deserialize;

pub use cors::*;
pub use extraction::*;
pub use health::*;
pub use server::*;
pub use telemetry::{LogFormat, TelemetryConfig};
pub use transcription::*;

/// Top-level formscribe configuration
///
/// One file configures both gateways; each service only reads its own
/// section plus `server` and `telemetry`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP listener configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Speech-to-text backend configuration
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    /// Field-extraction backend configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Logging and trace export configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
