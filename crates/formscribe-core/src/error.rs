use http::StatusCode;
use serde::Serialize;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each gateway crate's error type. Keeps domain errors
/// decoupled from axum; the crates render them through [`ErrorBody`].
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `validation_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;
}

/// JSON error body returned by both gateways: `{"detail": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    /// Build the body for any [`HttpError`]
    pub fn from_error<E: HttpError + ?Sized>(error: &E) -> Self {
        Self {
            detail: error.client_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Boom;

    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("boom")
        }
    }

    impl std::error::Error for Boom {}

    impl HttpError for Boom {
        fn status_code(&self) -> StatusCode {
            StatusCode::INTERNAL_SERVER_ERROR
        }

        fn error_type(&self) -> &str {
            "internal_error"
        }

        fn client_message(&self) -> String {
            format!("Error: {self}")
        }
    }

    #[test]
    fn body_serializes_detail_only() {
        let body = ErrorBody::from_error(&Boom);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "detail": "Error: boom" }));
    }
}
