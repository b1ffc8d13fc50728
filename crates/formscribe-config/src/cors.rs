use std::time::Duration;

use serde::Deserialize;

/// CORS configuration
///
/// Without a `[server.cors]` section the gateways allow every origin,
/// method and header, which is what browser clients of the form-filling
/// frontend expect during local development.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins (`"*"` or explicit list)
    #[serde(default)]
    pub origins: AnyOrList,
    /// Allowed HTTP methods (`"*"` or explicit list)
    #[serde(default)]
    pub methods: AnyOrList,
    /// Allowed request headers (`"*"` or explicit list)
    #[serde(default)]
    pub headers: AnyOrList,
    /// Headers exposed to the browser
    #[serde(default)]
    pub expose_headers: Vec<String>,
    /// Allow credentials
    #[serde(default)]
    pub credentials: bool,
    /// Preflight cache lifetime in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
    /// Allow private network access (CORS-RFC1918)
    #[serde(default)]
    pub private_network: bool,
}

impl CorsConfig {
    /// Allow any origin, method and header
    pub fn permissive() -> Self {
        Self {
            origins: AnyOrList::Any,
            methods: AnyOrList::Any,
            headers: AnyOrList::Any,
            expose_headers: Vec::new(),
            credentials: false,
            max_age: None,
            private_network: false,
        }
    }

    /// Preflight cache lifetime as a `Duration`
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}

/// Either the wildcard `"*"` or an explicit list of values
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawAnyOrList")]
pub enum AnyOrList {
    /// Match any value
    #[default]
    Any,
    /// Explicit list
    List(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnyOrList {
    One(String),
    Many(Vec<String>),
}

impl From<RawAnyOrList> for AnyOrList {
    fn from(raw: RawAnyOrList) -> Self {
        let values = match raw {
            RawAnyOrList::One(value) => vec![value],
            RawAnyOrList::Many(values) => values,
        };

        if values.iter().any(|v| v == "*") {
            Self::Any
        } else {
            Self::List(values)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_string_means_any() {
        let config: CorsConfig = toml::from_str(r#"origins = "*""#).unwrap();
        assert_eq!(config.origins, AnyOrList::Any);
        assert_eq!(config.methods, AnyOrList::Any);
    }

    #[test]
    fn explicit_lists_are_kept() {
        let config: CorsConfig = toml::from_str(
            r#"
            origins = ["http://localhost:5173"]
            methods = ["GET", "POST"]
            max_age = 600
            "#,
        )
        .unwrap();

        assert_eq!(config.origins, AnyOrList::List(vec!["http://localhost:5173".to_string()]));
        assert_eq!(
            config.methods,
            AnyOrList::List(vec!["GET".to_string(), "POST".to_string()])
        );
        assert_eq!(config.max_age_duration(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn wildcard_inside_list_means_any() {
        let config: CorsConfig = toml::from_str(r#"headers = ["content-type", "*"]"#).unwrap();
        assert_eq!(config.headers, AnyOrList::Any);
    }
}
