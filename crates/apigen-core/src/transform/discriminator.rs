use std::collections::HashSet;

use indexmap::IndexMap;

use crate::parse::ref_resolve::pointer_segments;
use crate::parse::schema::{Schema, SchemaOrRef};
use crate::parse::OpenApiSpec;
use crate::transform::name_normalizer::pointer_escape;

const SCHEMA_PREFIX: &str = "#/components/schemas/";

/// Normalize discriminators on component schemas before any type is compiled.
///
/// Every inline component schema is tagged with its own canonical reference
/// (`x-component-ref-path`). Schemas with a `discriminator` but no
/// `oneOf`/`anyOf` are "discriminating": they are the base type that
/// subtypes extend through `allOf`. For each such subtype the implicit
/// mapping (value = component name) is written into the base's
/// `discriminator.mapping` unless some entry already targets it.
///
/// Returns the canonical references of all discriminating schemas.
pub fn preprocess_components(spec: &mut OpenApiSpec) -> HashSet<String> {
    let mut discriminating = HashSet::new();
    let Some(components) = spec.components.as_mut() else {
        return discriminating;
    };
    let schemas = &mut components.schemas;

    for (name, schema) in schemas.iter_mut() {
        let SchemaOrRef::Schema(schema) = schema else {
            continue;
        };
        let path = component_path(name);
        if schema.discriminator.is_some() && schema.one_of.is_none() && schema.any_of.is_none() {
            discriminating.insert(path.clone());
        }
        schema.component_ref_path = Some(path);
    }

    let mut implicit: Vec<(String, String)> = Vec::new();
    for (name, schema) in schemas.iter() {
        let SchemaOrRef::Schema(schema) = schema else {
            continue;
        };
        let Some(all_of) = &schema.all_of else {
            continue;
        };
        let path = component_path(name);
        for member in all_of {
            let Some(parent) = member.ref_path().and_then(component_name) else {
                continue;
            };
            if !discriminating.contains(&component_path(&parent)) {
                continue;
            }
            let explicit = inline(schemas, &parent)
                .and_then(|p| p.discriminator.as_ref())
                .is_some_and(|d| d.mapping.values().any(|target| *target == path));
            if !explicit {
                implicit.push((parent, name.clone()));
            }
        }
    }

    for (parent, child) in implicit {
        if let Some(SchemaOrRef::Schema(schema)) = schemas.get_mut(&parent)
            && let Some(discriminator) = schema.discriminator.as_mut()
        {
            log::debug!("discriminator {parent}: implicit mapping {child}");
            discriminator
                .mapping
                .entry(child.clone())
                .or_insert_with(|| component_path(&child));
        }
    }

    discriminating
}

fn component_path(name: &str) -> String {
    format!("{SCHEMA_PREFIX}{}", pointer_escape(name))
}

/// The component name a schema reference points at, if it targets `#/components/schemas`.
fn component_name(reference: &str) -> Option<String> {
    let segments = pointer_segments(reference).ok()?;
    match segments.as_slice() {
        [components, schemas, name] if components == "components" && schemas == "schemas" => {
            Some(name.clone())
        }
        _ => None,
    }
}

fn inline<'a>(schemas: &'a IndexMap<String, SchemaOrRef>, name: &str) -> Option<&'a Schema> {
    match schemas.get(name)? {
        SchemaOrRef::Schema(schema) => Some(schema),
        SchemaOrRef::Ref { .. } => None,
    }
}
