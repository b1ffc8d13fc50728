use serde_json::{Map, Value};

use crate::{
    error::{ExtractionError, Result},
    types::{ExtractQuery, ExtractionRequest, FieldSpec},
};

/// Key of the flat field-name list used by the first schema version
const LEGACY_FIELDS_KEY: &str = "pdf_field_names";

impl ExtractionRequest {
    /// Validate an untyped JSON body
    ///
    /// `transcription` must be a string (empty is fine). `fields` must be a
    /// list of bare names or a list of `{name, type, value}` records with
    /// string members, never a mix of both; `pdf_field_names` is accepted in its
    /// place. `document_text` may be a string or null. Unknown keys are
    /// ignored. The first offending field rejects the whole request.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Validation`] naming the offending field
    pub fn from_json(body: &Value) -> Result<Self> {
        let Value::Object(object) = body else {
            return Err(ExtractionError::invalid("body", "request body must be a JSON object"));
        };

        let transcription = match object.get("transcription") {
            Some(Value::String(text)) => text.clone(),
            Some(_) => return Err(ExtractionError::invalid("transcription", "transcription must be a string")),
            None => return Err(ExtractionError::invalid("transcription", "transcription is required")),
        };

        let (key, raw_fields) = match (object.get("fields"), object.get(LEGACY_FIELDS_KEY)) {
            (Some(fields), _) => ("fields", fields),
            (None, Some(fields)) => (LEGACY_FIELDS_KEY, fields),
            (None, None) => return Err(ExtractionError::invalid("fields", "fields is required")),
        };

        let Value::Array(items) = raw_fields else {
            return Err(ExtractionError::invalid(key, format!("{key} must be a list")));
        };

        // One record switches the whole list to the record form
        let records = items.iter().any(Value::is_object);

        let fields = items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_field(&format!("{key}[{index}]"), item, records))
            .collect::<Result<Vec<_>>>()?;

        let document_text = match object.get("document_text") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(_) => return Err(ExtractionError::invalid("document_text", "document_text must be a string")),
        };

        Ok(Self {
            transcription,
            fields,
            document_text,
        })
    }

    /// Validate the query string of the legacy `GET /extract`
    ///
    /// Field names are split on commas and trimmed; empty segments are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Validation`] if either parameter is missing
    pub fn from_query(query: ExtractQuery) -> Result<Self> {
        let transcription = query
            .transcription
            .ok_or_else(|| ExtractionError::invalid("transcription", "transcription is required"))?;

        let names = query
            .pdf_field_names
            .ok_or_else(|| ExtractionError::invalid(LEGACY_FIELDS_KEY, "pdf_field_names is required"))?;

        let fields = names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(FieldSpec::named)
            .collect();

        Ok(Self {
            transcription,
            fields,
            document_text: None,
        })
    }
}

fn parse_field(path: &str, item: &Value, records: bool) -> Result<FieldSpec> {
    match item {
        Value::String(name) if !records => Ok(FieldSpec::named(name.clone())),
        Value::String(_) => Err(ExtractionError::invalid(
            path,
            format!("{path} must be a {{name, type, value}} record when other fields are records"),
        )),
        Value::Object(record) => Ok(FieldSpec {
            name: record_member(path, record, "name")?,
            field_type: record_member(path, record, "type")?,
            value: record_member(path, record, "value")?,
        }),
        _ => Err(ExtractionError::invalid(
            path,
            format!("{path} must be a field name or a {{name, type, value}} record"),
        )),
    }
}

fn record_member(path: &str, record: &Map<String, Value>, key: &str) -> Result<String> {
    match record.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ExtractionError::invalid(
            format!("{path}.{key}"),
            format!("{path}.{key} must be a string"),
        )),
        None => Err(ExtractionError::invalid(
            format!("{path}.{key}"),
            format!("{path}.{key} is required"),
        )),
    }
}
