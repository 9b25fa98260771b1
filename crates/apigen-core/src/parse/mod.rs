//! Serde model of the OpenAPI 3.x document plus in-document `$ref` lookup.

/// Declares an untagged `$ref`-or-inline enum and wires it into
/// [`MaybeRef`](ref_resolve::MaybeRef) so [`RefResolver`](ref_resolve::RefResolver)
/// can resolve it.
macro_rules! ref_or {
    ($(#[$meta:meta])* $name:ident :: $variant:ident($inner:ty) => $target:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(untagged)]
        pub enum $name {
            Ref {
                #[serde(rename = "$ref")]
                ref_path: String,
            },
            $variant($inner),
        }

        impl $crate::parse::ref_resolve::MaybeRef for $name {
            type Target = $target;

            fn ref_path(&self) -> Option<&str> {
                match self {
                    $name::Ref { ref_path } => Some(ref_path),
                    $name::$variant(_) => None,
                }
            }

            fn inline(&self) -> Option<&$target> {
                match self {
                    $name::Ref { .. } => None,
                    $name::$variant(inner) => Some(std::borrow::Borrow::borrow(inner)),
                }
            }
        }
    };
}

pub mod body;
pub mod document;
pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod schema;

pub use document::OpenApiSpec;

use crate::error::ParseError;

/// Parse an OpenAPI document from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_yaml_ng::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse an OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse a document whose format is unknown: JSON when it opens with `{`,
/// YAML otherwise.
pub fn from_str(input: &str) -> Result<OpenApiSpec, ParseError> {
    if input.trim_start().starts_with('{') {
        from_json(input)
    } else {
        from_yaml(input)
    }
}

fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi.clone()));
    }
    Ok(())
}
