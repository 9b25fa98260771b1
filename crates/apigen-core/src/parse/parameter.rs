use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::body::MediaType;
use super::schema::SchemaOrRef;

/// Where a parameter travels: the `in` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

/// A single operation parameter. `(name, location)` identifies it within an
/// operation; path-level parameters with the same pair are overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,

    /// Alternative to `schema`: a single media type describing the serialized value.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,
}

impl Parameter {
    /// An optional parameter with no schema.
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            required: false,
            schema: None,
            content: IndexMap::new(),
            style: None,
            explode: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<SchemaOrRef>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>, explode: Option<bool>) -> Self {
        self.style = Some(style.into());
        self.explode = explode;
        self
    }

    /// Whether the value is serialized as JSON text via `content`.
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

ref_or!(
    /// A parameter inline or as `#/components/parameters/...`.
    ParameterOrRef::Parameter(Parameter) => Parameter
);
