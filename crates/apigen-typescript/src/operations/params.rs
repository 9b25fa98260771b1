use indexmap::IndexMap;

use apigen_core::parse::parameter::{Parameter, ParameterLocation};
use apigen_core::parse::schema::{Schema, SchemaOrRef, SchemaType, TypeSet};
use apigen_core::transform::name_normalizer::upper_first;

use crate::compiler::OnlyMode;
use crate::identifier::to_identifier;

/// Merge path-level and operation-level parameters.
///
/// An operation parameter with the same `(name, in)` as a path parameter
/// replaces it in place; the rest are appended.
pub fn merge_parameters(path_level: Vec<Parameter>, operation_level: Vec<Parameter>) -> Vec<Parameter> {
    let mut merged = path_level;
    for param in operation_level {
        match merged
            .iter_mut()
            .find(|p| p.name == param.name && p.location == param.location)
        {
            Some(existing) => *existing = param,
            None => merged.push(param),
        }
    }
    merged
}

/// Fold bracketed query parameters (`filter[name]`, `filter[tag]`) into one
/// `deepObject` parameter per prefix, with one object property per suffix.
///
/// Used for documents converted from Swagger 2.0, which had no way to
/// declare deep objects directly.
pub fn support_deep_objects(params: Vec<Parameter>) -> Vec<Parameter> {
    let mut result: Vec<Parameter> = Vec::with_capacity(params.len());
    let mut merged: IndexMap<String, usize> = IndexMap::new();
    for param in params {
        let key = deep_object_key(&param.name).map(|(name, prop)| (name.to_string(), prop.to_string()));
        let Some((name, prop)) = key else {
            result.push(param);
            continue;
        };
        let index = *merged.entry(name.clone()).or_insert_with(|| {
            let object = Schema {
                schema_type: Some(TypeSet::Single(SchemaType::Object)),
                properties: Some(IndexMap::new()),
                ..Default::default()
            };
            result.push(
                Parameter::new(name, param.location)
                    .with_schema(object)
                    .with_style("deepObject", Some(true)),
            );
            result.len() - 1
        });
        if let Some(SchemaOrRef::Schema(object)) = &mut result[index].schema {
            let schema = param.schema.unwrap_or_else(|| Schema::default().into());
            object.properties.get_or_insert_with(IndexMap::new).insert(prop, schema);
        }
    }
    result
}

/// `name[prop]` (prefix non-empty, up to the first closing bracket).
fn deep_object_key(name: &str) -> Option<(&str, &str)> {
    let open = name.find('[').filter(|&i| i > 0)?;
    let rest = &name[open + 1..];
    let close = rest.find(']')?;
    Some((&name[..open], &rest[..close]))
}

/// One argument name per parameter, index-aligned with `params`.
///
/// Shorter names claim their identifier first; a later parameter whose
/// identifier is taken gets its location appended (`idQuery`).
pub fn argument_names(params: &[Parameter]) -> Vec<String> {
    let mut order: Vec<usize> = (0..params.len()).collect();
    order.sort_by_key(|&i| params[i].name.len());

    let mut names = vec![String::new(); params.len()];
    let mut taken: Vec<String> = Vec::with_capacity(params.len());
    for i in order {
        let param = &params[i];
        let mut name = to_identifier(&param.name, false, OnlyMode::None);
        if taken.contains(&name) {
            name.push_str(&upper_first(param.location.as_str()));
        }
        taken.push(name.clone());
        names[i] = name;
    }
    names
}

/// Parameters at `location`, paired with their argument names.
pub fn at_location<'p>(
    params: &'p [Parameter],
    names: &'p [String],
    location: ParameterLocation,
) -> impl Iterator<Item = (&'p Parameter, &'p str)> {
    params
        .iter()
        .zip(names)
        .filter(move |(p, _)| p.location == location)
        .map(|(p, n)| (p, n.as_str()))
}
