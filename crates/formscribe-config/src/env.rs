use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Failure while substituting `{{ env.VAR }}` placeholders
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error("environment variable not found: `{0}`")]
    MissingVariable(String),

    #[error("only variables scoped with 'env.' are supported: `{0}`")]
    UnsupportedScope(String),
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `{{ env.NAME }}` with an optional `| default("...")` tail
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Substitute `{{ env.VAR }}` placeholders in raw TOML text
///
/// `{{ env.VAR | default("x") }}` falls back to `x` when the variable is
/// unset. Comment lines are copied through untouched so a commented-out
/// secret never has to be present in the environment.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let mut lines = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        lines.push(expand_line(line)?);
    }

    let mut output = lines.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn expand_line(line: &str) -> Result<String, ExpandError> {
    let mut failure = None;

    let expanded = placeholder().replace_all(line, |caps: &Captures<'_>| {
        match resolve(&caps[1], caps.get(2).map(|m| m.as_str())) {
            Ok(value) => value,
            Err(err) => {
                if failure.is_none() {
                    failure = Some(err);
                }
                String::new()
            }
        }
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(expanded.into_owned()),
    }
}

fn resolve(key: &str, default: Option<&str>) -> Result<String, ExpandError> {
    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(ExpandError::UnsupportedScope(key.to_string()));
    };

    match (std::env::var(var_name), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_string()),
        (Err(_), None) => Err(ExpandError::MissingVariable(var_name.to_string())),
    }
}
