use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// The `type` field can be a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

impl TypeSet {
    pub fn is(&self, ty: SchemaType) -> bool {
        match self {
            TypeSet::Single(t) => *t == ty,
            TypeSet::Multiple(types) => types.len() == 1 && types[0] == ty,
        }
    }
}

ref_or!(
    /// A schema inline or as a `$ref` pointer.
    SchemaOrRef::Schema(Box<Schema>) => Schema
);

impl SchemaOrRef {
    pub fn reference(reference: impl Into<String>) -> Self {
        SchemaOrRef::Ref {
            ref_path: reference.into(),
        }
    }

    pub fn ref_path(&self) -> Option<&str> {
        match self {
            SchemaOrRef::Ref { ref_path } => Some(ref_path),
            SchemaOrRef::Schema(_) => None,
        }
    }
}

impl From<Schema> for SchemaOrRef {
    fn from(schema: Schema) -> Self {
        SchemaOrRef::Schema(Box::new(schema))
    }
}

/// Discriminator for polymorphic schemas.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Discriminator {
    #[serde(rename = "propertyName", skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

/// A JSON Schema object (OpenAPI 3.x superset).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    // Object properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaOrRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    // Array items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrRef>>,

    #[serde(rename = "prefixItems", skip_serializing_if = "Option::is_none")]
    pub prefix_items: Option<Vec<SchemaOrRef>>,

    // Composition
    #[serde(rename = "allOf", skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<SchemaOrRef>>,

    #[serde(rename = "oneOf", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaOrRef>>,

    #[serde(rename = "anyOf", skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaOrRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    // Enum values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    /// Member names for a named enum, one per value.
    #[serde(rename = "x-enumNames", skip_serializing_if = "Option::is_none")]
    pub x_enum_names: Option<Vec<String>>,

    #[serde(rename = "x-enum-varnames", skip_serializing_if = "Option::is_none")]
    pub x_enum_varnames: Option<Vec<String>>,

    // Read/Write only
    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(rename = "writeOnly", skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,

    // Const
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<serde_json::Value>,

    /// Canonical `$ref` of the component this schema was declared as.
    /// Set by the discriminator preprocessor, never by document authors.
    #[serde(rename = "x-component-ref-path", skip_serializing_if = "Option::is_none")]
    pub component_ref_path: Option<String>,
}

impl Schema {
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(false)
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.unwrap_or(false)
    }

    pub fn is_write_only(&self) -> bool {
        self.write_only.unwrap_or(false)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|req| req.iter().any(|r| r == name))
    }

    /// Custom enum member names, preferring `x-enumNames`.
    pub fn enum_member_names(&self) -> Option<&[String]> {
        self.x_enum_names
            .as_deref()
            .or(self.x_enum_varnames.as_deref())
    }

    /// Non-empty `enum` values, if any.
    pub fn enum_list(&self) -> Option<&[serde_json::Value]> {
        self.enum_values.as_deref().filter(|v| !v.is_empty())
    }

    /// Whether the schema declares an object shape directly.
    pub fn has_object_shape(&self) -> bool {
        self.properties.is_some()
            || matches!(
                self.additional_properties,
                Some(AdditionalProperties::Schema(_)) | Some(AdditionalProperties::Bool(true))
            )
    }
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaOrRef>),
}
