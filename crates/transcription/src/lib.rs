#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Transcription Gateway
//!
//! Accepts an audio upload and returns the text recognized by a local
//! whisper.cpp model.

mod audio_file;
mod error;
mod provider;
mod request;
mod server;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::DefaultBodyLimit, extract::State, routing::post};

pub use error::{Result, TranscriptionError};
pub use provider::Transcriber;
pub use request::AudioUpload;
pub use server::Server;
pub use types::{TranscriptionRequest, TranscriptionResponse};

use server::TranscriptionServerBuilder;

/// Build the transcription server from configuration
pub fn build_server(config: &formscribe_config::Config) -> Arc<Server> {
    Arc::new(TranscriptionServerBuilder::new(config).build())
}

/// Create the endpoint router for transcription
///
/// `max_upload_bytes` bounds the multipart body.
pub fn endpoint_router(max_upload_bytes: usize) -> Router<Arc<Server>> {
    Router::new()
        .route("/transcribe", post(transcribe))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Handle transcription requests
async fn transcribe(
    State(server): State<Arc<Server>>,
    AudioUpload(request): AudioUpload,
) -> Result<Json<TranscriptionResponse>> {
    tracing::debug!("transcription handler called");

    let response = server.transcribe(request).await?;

    tracing::debug!("transcription complete");

    Ok(Json(response))
}
