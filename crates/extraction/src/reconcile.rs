//! Reconciliation of model output against the requested field set
//!
//! Generation models are told to answer with exactly the requested keys
//! but regularly change their casing, invent extra keys, wrap the object
//! in a Markdown fence or nest values. The caller always gets back exactly
//! the keys it asked for.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{ExtractionError, Result};

/// Map a raw completion onto the requested field names
///
/// Fences are stripped, then the text is parsed as JSON. A syntax error
/// fails the request; a well-formed value that is not an object is
/// treated as an empty object. Each requested name takes the value of the
/// first key that equals it after lowercasing; missing keys and
/// non-string values resolve to `""`. Keys the model invented are
/// dropped. A name requested twice appears once.
///
/// # Errors
///
/// Returns [`ExtractionError::MalformedOutput`] when the cleaned text is
/// not valid JSON
pub fn reconcile<'a, I>(raw: &str, field_names: I) -> Result<IndexMap<String, String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let parsed = parse_completion(raw)?;

    let empty = Map::new();
    let object = match &parsed {
        Value::Object(object) => object,
        other => {
            tracing::warn!(kind = json_kind(other), "model output is not a JSON object, treating it as empty");
            &empty
        }
    };

    let resolved = field_names
        .into_iter()
        .map(|name| (name.to_string(), resolve(object, name)))
        .collect();

    Ok(resolved)
}

/// Strip Markdown fences and surrounding whitespace from a completion
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = strip_language_tag(rest);
    }

    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Drop the info string after an opening fence (` ```json `)
fn strip_language_tag(text: &str) -> &str {
    let tag_len = text.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(text.len());
    let (tag, rest) = text.split_at(tag_len);

    if tag.eq_ignore_ascii_case("json") || (!tag.is_empty() && rest.starts_with(char::is_whitespace)) {
        rest
    } else {
        text
    }
}

/// Parse the cleaned completion
///
/// Some backends return the object with every quote escaped
/// (`{\"name\": \"Jane\"}`). That form is only unescaped when the text
/// does not parse as it is, so escaped quotes inside valid string values
/// survive.
fn parse_completion(raw: &str) -> Result<Value> {
    let cleaned = strip_code_fences(raw);

    match serde_json::from_str(cleaned) {
        Ok(value) => Ok(value),
        Err(first) if cleaned.contains("\\\"") => {
            serde_json::from_str(&cleaned.replace("\\\"", "\"")).map_err(|_| malformed(cleaned, &first))
        }
        Err(e) => Err(malformed(cleaned, &e)),
    }
}

fn malformed(cleaned: &str, error: &serde_json::Error) -> ExtractionError {
    ExtractionError::MalformedOutput {
        raw: cleaned.to_string(),
        reason: error.to_string(),
    }
}

fn resolve(object: &Map<String, Value>, name: &str) -> String {
    let wanted = name.to_lowercase();

    match object.iter().find(|(key, _)| key.to_lowercase() == wanted) {
        Some((_, Value::String(value))) => value.clone(),
        Some((key, other)) => {
            tracing::debug!(field = name, key = %key, kind = json_kind(other), "non-string value for field, using empty string");
            String::new()
        }
        None => String::new(),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
