use std::time::Duration;

use axum::http;
use reqwest::Client;

/// HTTP client for the generation backend
///
/// `timeout` bounds one whole generation call; local models can take
/// tens of seconds on a cold start.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    let mut headers = http::HeaderMap::new();
    headers.insert(http::header::CONNECTION, http::HeaderValue::from_static("keep-alive"));

    Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .default_headers(headers)
        .build()
}
