use formscribe_config::{AnyOrList, CorsConfig};
use http::Method;
use http::header::HeaderName;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build a Tower CORS layer from configuration
///
/// Entries that do not parse as an origin, method or header name are
/// skipped with a warning.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    layer = match &config.origins {
        AnyOrList::Any => layer.allow_origin(AllowOrigin::any()),
        AnyOrList::List(origins) => layer.allow_origin(parse_all::<http::HeaderValue>(origins, "origin")),
    };

    layer = match &config.methods {
        AnyOrList::Any => layer.allow_methods(AllowMethods::any()),
        AnyOrList::List(methods) => layer.allow_methods(parse_all::<Method>(methods, "method")),
    };

    layer = match &config.headers {
        AnyOrList::Any => layer.allow_headers(AllowHeaders::any()),
        AnyOrList::List(headers) => layer.allow_headers(parse_all::<HeaderName>(headers, "header")),
    };

    if !config.expose_headers.is_empty() {
        layer = layer.expose_headers(parse_all::<HeaderName>(&config.expose_headers, "header"));
    }

    if config.credentials {
        layer = layer.allow_credentials(true);
    }

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    if config.private_network {
        layer = layer.allow_private_network(true);
    }

    layer
}

fn parse_all<T: std::str::FromStr>(values: &[String], kind: &str) -> Vec<T> {
    values
        .iter()
        .filter_map(|value| {
            let parsed = value.parse().ok();
            if parsed.is_none() {
                tracing::warn!(%value, kind, "ignoring invalid CORS entry");
            }
            parsed
        })
        .collect()
}
