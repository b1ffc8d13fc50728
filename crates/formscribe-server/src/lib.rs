#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod cors;
mod health;

use std::fmt;
use std::net::SocketAddr;

use axum::Router;
use formscribe_config::{Config, CorsConfig};
use tower_http::trace::TraceLayer;

/// One of the two independently deployed gateways
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Speech to text, `POST /transcribe`
    Transcription,
    /// Form field extraction, `POST /extract` and `GET /extract`
    Extraction,
}

impl Service {
    /// Port used when no listen address is configured
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Transcription => 8000,
            Self::Extraction => 8001,
        }
    }

    /// Message reported by the liveness probe
    pub const fn health_message(self) -> &'static str {
        match self {
            Self::Transcription => "Whisper Service is running",
            Self::Extraction => "LLM Service is running",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Transcription => "transcription",
            Self::Extraction => "extraction",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build one gateway from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the service backend fails to initialize
    pub fn new(config: &Config, service: Service) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], service.default_port())));

        let mut app = match service {
            Service::Transcription => {
                let state = transcription::build_server(config);
                let max_upload_bytes = config.transcription.max_upload_bytes;
                transcription::endpoint_router(max_upload_bytes).with_state(state)
            }
            Service::Extraction => {
                let state = extraction::build_server(config)?;
                extraction::endpoint_router().with_state(state)
            }
        };

        // Health check
        if config.server.health.enabled {
            let health = Router::new()
                .route(&config.server.health.path, axum::routing::get(health::health_handler))
                .with_state(service.health_message());
            app = app.merge(health);
        }

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS
        let cors = config.server.cors.clone().unwrap_or_else(CorsConfig::permissive);
        app = app.layer(cors::cors_layer(&cors));

        tracing::debug!(%service, %listen_address, "server assembled");

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
