use axum::{Json, extract::State};
use serde::Serialize;

/// Liveness probe body
#[derive(Debug, Serialize)]
pub struct Health {
    pub message: &'static str,
    pub status: &'static str,
}

/// Health check handler
pub async fn health_handler(State(message): State<&'static str>) -> Json<Health> {
    Json(Health {
        message,
        status: "healthy",
    })
}
