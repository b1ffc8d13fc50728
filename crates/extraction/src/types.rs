use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One target form field
///
/// Bare field names from the flat legacy schema become records with an
/// empty type and value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Field name, used verbatim as the output key
    pub name: String,
    /// Form widget type as reported by the caller (e.g. `PDFTextField`)
    #[serde(rename = "type")]
    pub field_type: String,
    /// Value currently filled into the form
    pub value: String,
}

impl FieldSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: String::new(),
            value: String::new(),
        }
    }
}

/// Validated extraction request
///
/// Built from untyped JSON by [`ExtractionRequest::from_json`] or from the
/// legacy query string by [`ExtractionRequest::from_query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub transcription: String,
    pub fields: Vec<FieldSpec>,
    /// Text layer of the target document, used as disambiguation context
    pub document_text: Option<String>,
}

impl ExtractionRequest {
    /// Requested field names in input order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }
}

/// Query parameters of the legacy `GET /extract`
#[derive(Debug, Default, Deserialize)]
pub struct ExtractQuery {
    pub transcription: Option<String>,
    /// Comma-separated field names
    pub pdf_field_names: Option<String>,
}

/// Response of both extraction endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    /// Exactly the requested field names, each mapped to its extracted value
    pub extracted_fields: IndexMap<String, String>,
}
