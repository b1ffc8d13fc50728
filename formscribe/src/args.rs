use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use formscribe_server::Service;

/// Speech-driven PDF form filling gateways
#[derive(Debug, Parser)]
#[command(name = "formscribe", about = "Transcription and form-field extraction gateways")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "formscribe.toml", env = "FORMSCRIBE_CONFIG", global = true)]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "FORMSCRIBE_LISTEN", global = true)]
    pub listen: Option<SocketAddr>,

    /// Log filter directive
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    pub log_filter: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Command {
    /// Run the transcription gateway (`POST /transcribe`)
    Transcription,
    /// Run the field-extraction gateway (`POST /extract`)
    Extraction,
}

impl Command {
    pub const fn service(self) -> Service {
        match self {
            Self::Transcription => Service::Transcription,
            Self::Extraction => Service::Extraction,
        }
    }
}
