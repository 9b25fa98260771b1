use indexmap::IndexMap;

use apigen_core::parse::body::MediaType;
use apigen_core::parse::schema::{Schema, SchemaOrRef, SchemaType, TypeSet};

/// Request body encodings, in the order they are preferred.
const BODY_CONTENT_TYPES: [(&str, BodyFormat); 4] = [
    ("*/*", BodyFormat::Json),
    ("application/json", BodyFormat::Json),
    ("application/x-www-form-urlencoded", BodyFormat::Form),
    ("multipart/form-data", BodyFormat::Multipart),
];

/// Runtime helper that encodes the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    Form,
    Multipart,
}

impl BodyFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyFormat::Json => "json",
            BodyFormat::Form => "form",
            BodyFormat::Multipart => "multipart",
        }
    }
}

/// How the response body is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Json,
    Text,
    Blob,
}

impl ResponseKind {
    /// Runtime fetch primitive for this kind.
    pub fn fetch_fn(&self) -> &'static str {
        match self {
            ResponseKind::Json => "fetchJson",
            ResponseKind::Text => "fetchText",
            ResponseKind::Blob => "fetchBlob",
        }
    }

    /// Whether the fetch call carries the typed response union.
    pub fn is_typed(&self) -> bool {
        !matches!(self, ResponseKind::Text)
    }
}

pub fn is_json_mime_type(mime: &str) -> bool {
    mime == "*/*" || mime.to_ascii_lowercase().contains("json")
}

/// `type/subtype` with exactly one slash.
pub fn is_mime_type(s: &str) -> bool {
    matches!(s.split_once('/'), Some((ty, sub)) if !ty.is_empty() && !sub.is_empty() && !sub.contains('/'))
}

/// Pick the body encoding from the declared media types.
pub fn body_format(content: &IndexMap<String, MediaType>) -> Option<BodyFormat> {
    BODY_CONTENT_TYPES
        .iter()
        .find(|(mime, _)| content.contains_key(*mime))
        .map(|(_, format)| *format)
        .or_else(|| {
            content
                .keys()
                .any(|mime| is_json_mime_type(mime))
                .then_some(BodyFormat::Json)
        })
}

/// Classify an operation's responses; one entry per declared response,
/// listing its content types.
pub fn classify_responses(responses: &[Vec<&str>]) -> ResponseKind {
    let all = || responses.iter().flatten();
    if all().next().is_none() {
        return ResponseKind::Text;
    }
    if all().any(|mime| is_json_mime_type(mime)) {
        return ResponseKind::Json;
    }
    if all().any(|mime| mime.starts_with("text/")) {
        return ResponseKind::Text;
    }
    ResponseKind::Blob
}

/// The schema describing a content map.
///
/// The first media type with a schema wins; otherwise empty and `text/*`
/// content is a string and anything else is binary.
pub fn schema_from_content(content: &IndexMap<String, MediaType>) -> SchemaOrRef {
    if let Some(schema) = content
        .iter()
        .find(|(mime, _)| is_mime_type(mime))
        .and_then(|(_, media)| media.schema.clone())
    {
        return schema;
    }
    let text = content.is_empty() || content.keys().any(|mime| mime.starts_with("text/"));
    Schema {
        schema_type: Some(TypeSet::Single(SchemaType::String)),
        format: (!text).then(|| "binary".to_string()),
        ..Default::default()
    }
    .into()
}
