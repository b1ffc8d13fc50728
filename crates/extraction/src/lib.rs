#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Field-Extraction Gateway
//!
//! Turns a transcription plus a description of PDF form fields into a
//! field-name to value mapping by prompting a locally hosted model.

mod error;
mod http_client;
mod prompt;
mod provider;
mod reconcile;
mod server;
mod types;
mod validate;

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    routing::post,
};

pub use error::{ExtractionError, Result};
pub use prompt::{DEFAULT_TEMPLATE, PromptTemplate};
pub use provider::TextGenerator;
pub use reconcile::{reconcile, strip_code_fences};
pub use server::Server;
pub use types::{ExtractQuery, ExtractionRequest, ExtractionResponse, FieldSpec};

use server::ExtractionServerBuilder;

/// Build the extraction server from configuration
///
/// # Errors
///
/// Returns an error if the server fails to initialize
pub fn build_server(config: &formscribe_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        ExtractionServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize extraction server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for field extraction
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/extract", post(extract).get(extract_from_query))
}

/// Handle `POST /extract` with a JSON body
///
/// The body is parsed as untyped JSON and validated field by field so that
/// every rejection carries a `{"detail": ...}` body naming the field.
async fn extract(State(server): State<Arc<Server>>, body: Bytes) -> Result<Json<ExtractionResponse>> {
    let body: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| ExtractionError::invalid("body", format!("request body is not valid JSON: {e}")))?;

    let request = ExtractionRequest::from_json(&body)?;

    tracing::debug!(fields = request.fields.len(), "extraction handler called");

    Ok(Json(server.extract(&request).await?))
}

/// Handle the legacy `GET /extract?transcription=...&pdf_field_names=a,b`
async fn extract_from_query(
    State(server): State<Arc<Server>>,
    Query(query): Query<ExtractQuery>,
) -> Result<Json<ExtractionResponse>> {
    let request = ExtractionRequest::from_query(query)?;

    tracing::debug!(fields = request.fields.len(), "legacy extraction handler called");

    Ok(Json(server.extract(&request).await?))
}
