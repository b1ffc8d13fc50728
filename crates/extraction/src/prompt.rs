use std::{io::ErrorKind, path::Path};

use serde_json::Value;

use crate::types::ExtractionRequest;

/// Template used when no template file is available
///
/// Placeholders: `{transcription}`, `{fields}` (JSON list of field
/// records), `{pdf_field_names}` (JSON list of names), `{document_text}`
/// and `{document_section}` (a quoted context block, empty without
/// document text). `{{` and `}}` produce literal braces.
pub const DEFAULT_TEMPLATE: &str = r#"Extract structured data from the following transcription to fill out a PDF form.
Return ONLY a JSON object where each key is a PDF field name and the value is the extracted data.
Use this format: {{"field_name": "value"}}.

Transcription: "{transcription}"

PDF fields (name, type and current value): {fields}
{document_section}
Rules:
- Respond with the JSON object only. Do not add explanations, comments or Markdown.
- Include every field name listed above as a key, spelled exactly as given.
- Write every date as mm/dd/yyyy.
- Use an empty string ("") for any field the transcription gives no evidence for.
- Ignore irrelevant or repeated information.
- Match values to the closest field name semantically."#;

/// Prompt template for field extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    /// Read a template file, falling back to [`DEFAULT_TEMPLATE`]
    ///
    /// A missing, unreadable or blank file is not an error.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) if !text.trim().is_empty() => {
                tracing::debug!(path = %path.display(), "loaded prompt template");
                Self::new(text.trim())
            }
            Ok(_) => {
                tracing::warn!(path = %path.display(), "prompt template is empty, using built-in template");
                Self::default()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no prompt template file, using built-in template");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read prompt template, using built-in template");
                Self::default()
            }
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the prompt for one request
    ///
    /// Substituted values are inserted verbatim and never re-scanned, so
    /// braces inside a transcription are safe. Unknown placeholders are
    /// left as they are.
    pub fn render(&self, request: &ExtractionRequest) -> String {
        let values = Substitutions::new(request);

        let mut output = String::with_capacity(self.source.len() + request.transcription.len() + values.fields.len());
        let mut rest = self.source.as_str();

        while let Some(pos) = rest.find(['{', '}']) {
            output.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if let Some(after) = tail.strip_prefix("{{") {
                output.push('{');
                rest = after;
            } else if let Some(after) = tail.strip_prefix("}}") {
                output.push('}');
                rest = after;
            } else if let Some(after) = tail.strip_prefix('{') {
                match after.find('}').and_then(|end| values.get(&after[..end]).map(|value| (end, value))) {
                    Some((end, value)) => {
                        output.push_str(value);
                        rest = &after[end + 1..];
                    }
                    None => {
                        output.push('{');
                        rest = after;
                    }
                }
            } else {
                output.push('}');
                rest = &tail[1..];
            }
        }

        output.push_str(rest);
        output
    }
}

/// Placeholder values for one request
struct Substitutions<'a> {
    request: &'a ExtractionRequest,
    fields: String,
    names: String,
    document_section: String,
}

impl<'a> Substitutions<'a> {
    fn new(request: &'a ExtractionRequest) -> Self {
        let fields = Value::Array(
            request
                .fields
                .iter()
                .map(|field| {
                    serde_json::json!({
                        "name": field.name,
                        "type": field.field_type,
                        "value": field.value,
                    })
                })
                .collect(),
        )
        .to_string();

        let names = Value::Array(request.field_names().map(|name| Value::String(name.to_string())).collect()).to_string();

        let document_section = request
            .document_text
            .as_deref()
            .map(|text| format!("\nText of the PDF document, for context only:\n\"\"\"\n{text}\n\"\"\"\n"))
            .unwrap_or_default();

        Self {
            request,
            fields,
            names,
            document_section,
        }
    }

    fn get(&self, name: &str) -> Option<&str> {
        match name {
            "transcription" => Some(self.request.transcription.as_str()),
            "fields" => Some(self.fields.as_str()),
            "pdf_field_names" => Some(self.names.as_str()),
            "document_text" => Some(self.request.document_text.as_deref().unwrap_or_default()),
            "document_section" => Some(self.document_section.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::types::FieldSpec;

    fn request() -> ExtractionRequest {
        ExtractionRequest {
            transcription: "My name is Jane and I was born on March 3rd 1990".to_string(),
            fields: vec![
                FieldSpec {
                    name: "Full Name".to_string(),
                    field_type: "PDFTextField".to_string(),
                    value: String::new(),
                },
                FieldSpec::named("dob"),
            ],
            document_text: None,
        }
    }

    #[test]
    fn default_template_carries_every_rule() {
        let prompt = PromptTemplate::default().render(&request());

        assert!(prompt.contains("Return ONLY a JSON object"));
        assert!(prompt.contains("Include every field name"));
        assert!(prompt.contains("mm/dd/yyyy"));
        assert!(prompt.contains(r#"empty string ("")"#));
        assert!(prompt.contains("Ignore irrelevant or repeated information"));
        assert!(prompt.contains(r#"Use this format: {"field_name": "value"}."#));
    }

    #[test]
    fn substitutes_transcription_and_fields_in_order() {
        let prompt = PromptTemplate::default().render(&request());

        assert!(prompt.contains("Transcription: \"My name is Jane and I was born on March 3rd 1990\""));
        assert!(prompt.contains(
            r#"[{"name":"Full Name","type":"PDFTextField","value":""},{"name":"dob","type":"","value":""}]"#
        ));
        assert!(!prompt.contains("{transcription}"));
        assert!(!prompt.contains("{document_section}"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let template = PromptTemplate::default();
        assert_eq!(template.render(&request()), template.render(&request()));
    }

    #[test]
    fn document_text_adds_context_block() {
        let mut request = request();
        request.document_text = Some("APPLICATION FOR LIBRARY CARD".to_string());

        let prompt = PromptTemplate::default().render(&request);
        assert!(prompt.contains("for context only:\n\"\"\"\nAPPLICATION FOR LIBRARY CARD\n\"\"\""));
    }

    #[test]
    fn legacy_placeholder_renders_name_list() {
        let template = PromptTemplate::new("T={transcription} N={pdf_field_names}");
        let mut request = request();
        request.transcription = "hi".to_string();

        assert_eq!(template.render(&request), r#"T=hi N=["Full Name","dob"]"#);
    }

    #[test]
    fn braces_in_values_are_not_rescanned() {
        let template = PromptTemplate::new("<{transcription}>");
        let mut request = request();
        request.transcription = "say {fields} and }} {{".to_string();

        assert_eq!(template.render(&request), "<say {fields} and }} {{>");
    }

    #[test]
    fn unknown_placeholders_and_stray_braces_are_kept() {
        let template = PromptTemplate::new("{unknown} { open } close} {{x}}");
        assert_eq!(template.render(&request()), "{unknown} { open } close} {x}");
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let template = PromptTemplate::load(Path::new("/nonexistent/prompts/extract_fields.txt"));
        assert_eq!(template, PromptTemplate::default());
    }

    #[test]
    fn blank_file_falls_back_to_default() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(PromptTemplate::load(file.path()), PromptTemplate::default());
    }

    #[test]
    fn file_contents_are_trimmed_and_used() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\nFields: {{fields}} -> {fields}\n\n").unwrap();

        let template = PromptTemplate::load(file.path());
        assert_eq!(template.source(), "Fields: {{fields}} -> {fields}");
    }

    #[test]
    fn shipped_template_matches_default() {
        let shipped = include_str!("../../../prompts/extract_fields.txt");
        assert_eq!(shipped.trim(), DEFAULT_TEMPLATE);
    }
}
