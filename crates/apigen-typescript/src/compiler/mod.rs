//! Schema-to-type compiler.
//!
//! Dispatch follows a fixed precedence (first match wins):
//! reference, `oneOf`, `anyOf`, discriminating base, `allOf`, `prefixItems`,
//! `items`, object shape, `enum`, binary format, `const`, `type`, fallback.

mod alias;
mod enums;
mod only_mode;

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;

use apigen_core::config::GenerateOptions;
use apigen_core::error::GenerateError;
use apigen_core::parse::ref_resolve::RefResolver;
use apigen_core::parse::schema::{
    AdditionalProperties, Discriminator, Schema, SchemaOrRef, SchemaType, TypeSet,
};
use apigen_core::transform::name_normalizer::ref_basename;

use crate::ast::{Keyword, TsLiteral, TsProp, TsType};
use crate::context::GenerationContext;

pub use only_mode::{OnlyMode, OnlyModeFlags};

/// Compiles schema nodes into type expressions, registering named
/// declarations in the run's [`GenerationContext`] as it goes.
pub struct SchemaCompiler<'a> {
    resolver: &'a RefResolver,
    options: &'a GenerateOptions,
    ctx: &'a mut GenerationContext,
}

impl<'a> SchemaCompiler<'a> {
    pub fn new(
        resolver: &'a RefResolver,
        options: &'a GenerateOptions,
        ctx: &'a mut GenerationContext,
    ) -> Self {
        Self {
            resolver,
            options,
            ctx,
        }
    }

    pub fn resolver(&self) -> &'a RefResolver {
        self.resolver
    }

    pub fn options(&self) -> &'a GenerateOptions {
        self.options
    }

    pub fn context(&mut self) -> &mut GenerationContext {
        self.ctx
    }

    /// Compile an optional schema node. Absent schemas become `any`.
    pub fn type_from_schema(
        &mut self,
        schema: Option<&SchemaOrRef>,
        name: Option<&str>,
        mode: OnlyMode,
    ) -> Result<TsType, GenerateError> {
        match schema {
            None => Ok(TsType::ANY),
            Some(SchemaOrRef::Ref { ref_path }) => self.ref_alias(ref_path, mode, false),
            Some(SchemaOrRef::Schema(inline)) => self.inline_type(inline, name, mode),
        }
    }

    /// Compile an inline schema, unioning with `null` when it is nullable.
    pub fn inline_type(
        &mut self,
        schema: &Schema,
        name: Option<&str>,
        mode: OnlyMode,
    ) -> Result<TsType, GenerateError> {
        let ty = self.base_type(schema, name, mode)?;
        if schema.is_nullable() {
            Ok(TsType::Union(vec![ty, TsType::Keyword(Keyword::Null)]))
        } else {
            Ok(ty)
        }
    }

    fn base_type(
        &mut self,
        schema: &Schema,
        name: Option<&str>,
        mode: OnlyMode,
    ) -> Result<TsType, GenerateError> {
        if let Some(one_of) = &schema.one_of {
            return self.union_type(one_of, schema.discriminator.as_ref(), mode);
        }
        if let Some(any_of) = &schema.any_of {
            return self.union_type(any_of, None, mode);
        }
        if let Some(mapping) = self.discriminating_mapping(schema) {
            let variants: Vec<SchemaOrRef> = mapping.values().map(SchemaOrRef::reference).collect();
            return self.union_type(&variants, None, mode);
        }
        if let Some(all_of) = &schema.all_of {
            return self.intersection_type(schema, all_of, mode);
        }
        if let Some(prefix_items) = &schema.prefix_items {
            let items = prefix_items
                .iter()
                .map(|item| self.type_from_schema(Some(item), None, mode))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(TsType::Tuple(items));
        }
        if let Some(items) = &schema.items {
            let item = self.type_from_schema(Some(items), None, mode)?;
            return Ok(TsType::Array(Box::new(item)));
        }
        if schema.has_object_shape() {
            return self.properties_type(
                schema.properties.as_ref(),
                schema.required.as_deref(),
                schema.additional_properties.as_ref(),
                mode,
            );
        }
        if let Some(values) = schema.enum_list() {
            return match name {
                Some(name) if self.is_true_enum(schema, name) => self.true_enum(schema, name),
                _ => enum_literal_union(values),
            };
        }
        if schema.format.as_deref() == Some("binary") {
            return Ok(TsType::Ref("Blob".to_string()));
        }
        if let Some(value) = &schema.const_value {
            return literal_type(value);
        }
        if let Some(types) = &schema.schema_type {
            return Ok(type_set(types));
        }
        Ok(TsType::ANY)
    }

    /// The explicit mapping of a discriminating base schema, when non-empty.
    fn discriminating_mapping<'s>(&self, schema: &'s Schema) -> Option<&'s IndexMap<String, String>> {
        let path = schema.component_ref_path.as_ref()?;
        if !self.ctx.discriminating.contains(path) {
            return None;
        }
        schema
            .discriminator
            .as_ref()
            .map(|d| &d.mapping)
            .filter(|mapping| !mapping.is_empty())
    }

    /// `oneOf`/`anyOf` members; tagged with the discriminator value when one is given.
    fn union_type(
        &mut self,
        variants: &[SchemaOrRef],
        discriminator: Option<&Discriminator>,
        mode: OnlyMode,
    ) -> Result<TsType, GenerateError> {
        let Some(discriminator) = discriminator else {
            let members = variants
                .iter()
                .map(|variant| self.type_from_schema(Some(variant), None, mode))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(TsType::union(members));
        };

        let property = discriminator.property_name.as_deref().ok_or_else(|| {
            GenerateError::DiscriminatorConfig("discriminators require a propertyName".to_string())
        })?;

        let mapped: HashSet<&str> = discriminator
            .mapping
            .values()
            .map(|target| ref_basename(target))
            .collect();
        let mut tagged: Vec<(String, String)> = discriminator
            .mapping
            .iter()
            .map(|(value, target)| (value.clone(), target.clone()))
            .collect();
        for variant in variants {
            let reference = variant.ref_path().ok_or_else(|| {
                GenerateError::DiscriminatorConfig(format!(
                    "discriminator {property} requires references, not inline schemas"
                ))
            })?;
            let value = ref_basename(reference);
            if !mapped.contains(value) {
                tagged.push((value.to_string(), reference.to_string()));
            }
        }

        let mut members = Vec::with_capacity(tagged.len());
        for (value, reference) in tagged {
            let tag = TsType::object(vec![TsProp::required(property, TsType::string_literal(value))]);
            let variant = self.ref_alias(&reference, mode, false)?;
            members.push(TsType::Intersection(vec![tag, variant]));
        }
        Ok(TsType::union(members))
    }

    /// `allOf` members, plus the container's own properties when it declares any.
    fn intersection_type(
        &mut self,
        schema: &Schema,
        all_of: &[SchemaOrRef],
        mode: OnlyMode,
    ) -> Result<TsType, GenerateError> {
        let mut members = Vec::with_capacity(all_of.len() + 1);
        for child in all_of {
            match child {
                SchemaOrRef::Ref { ref_path } => {
                    let parent: Schema = self.resolver.resolve_ref(ref_path)?;
                    let discriminating = parent
                        .component_ref_path
                        .as_ref()
                        .is_some_and(|path| self.ctx.discriminating.contains(path));
                    if !discriminating {
                        members.push(self.ref_alias(ref_path, mode, false)?);
                        continue;
                    }
                    if let Some(tag) = discriminator_tag(&parent, schema)? {
                        members.push(tag);
                    }
                    members.push(self.ref_alias(ref_path, mode, true)?);
                }
                SchemaOrRef::Schema(inline) if inline.required.is_none() && schema.required.is_some() => {
                    let mut inherited = inline.as_ref().clone();
                    inherited.required = schema.required.clone();
                    members.push(self.inline_type(&inherited, None, mode)?);
                }
                SchemaOrRef::Schema(inline) => {
                    members.push(self.inline_type(inline, None, mode)?);
                }
            }
        }
        if schema.has_object_shape() {
            members.push(self.properties_type(
                schema.properties.as_ref(),
                schema.required.as_deref(),
                schema.additional_properties.as_ref(),
                mode,
            )?);
        }
        Ok(TsType::Intersection(members))
    }

    /// Object literal type for the properties visible in `mode`.
    fn properties_type(
        &mut self,
        properties: Option<&IndexMap<String, SchemaOrRef>>,
        required: Option<&[String]>,
        additional: Option<&AdditionalProperties>,
        mode: OnlyMode,
    ) -> Result<TsType, GenerateError> {
        let mut props = Vec::new();
        for (name, prop) in properties.into_iter().flatten() {
            let flags = self.check_only_mode(prop, false)?;
            if !mode.keeps(flags) {
                continue;
            }
            let mut ty = self.type_from_schema(Some(prop), Some(name.as_str()), mode)?;
            let is_required = required.is_some_and(|r| r.iter().any(|n| n == name));
            if !is_required && self.options.union_undefined {
                ty = TsType::Union(vec![ty, TsType::Keyword(Keyword::Undefined)]);
            }
            props.push(TsProp {
                name: name.clone(),
                ty,
                optional: !is_required,
            });
        }
        let index = match additional {
            Some(AdditionalProperties::Bool(true)) => Some(Box::new(TsType::ANY)),
            Some(AdditionalProperties::Schema(schema)) => {
                Some(Box::new(self.type_from_schema(Some(schema), None, mode)?))
            }
            _ => None,
        };
        Ok(TsType::Object { props, index })
    }
}

/// `{ <propertyName>: "<value>" }` for a subtype listed in its base's mapping.
fn discriminator_tag(parent: &Schema, child: &Schema) -> Result<Option<TsType>, GenerateError> {
    let Some(discriminator) = &parent.discriminator else {
        return Ok(None);
    };
    let Some(own_path) = &child.component_ref_path else {
        return Ok(None);
    };
    let Some((value, _)) = discriminator
        .mapping
        .iter()
        .find(|(_, target)| *target == own_path)
    else {
        return Ok(None);
    };
    let property = discriminator.property_name.as_deref().ok_or_else(|| {
        GenerateError::DiscriminatorConfig("discriminators require a propertyName".to_string())
    })?;
    Ok(Some(TsType::object(vec![TsProp::required(
        property,
        TsType::string_literal(value.clone()),
    )])))
}

fn keyword(ty: SchemaType) -> TsType {
    match ty {
        SchemaType::String => TsType::Keyword(Keyword::String),
        SchemaType::Number | SchemaType::Integer => TsType::Keyword(Keyword::Number),
        SchemaType::Boolean => TsType::Keyword(Keyword::Boolean),
        SchemaType::Null => TsType::Keyword(Keyword::Null),
        SchemaType::Object => TsType::Keyword(Keyword::Object),
        SchemaType::Array => TsType::Array(Box::new(TsType::ANY)),
    }
}

fn type_set(types: &TypeSet) -> TsType {
    match types {
        TypeSet::Single(ty) => keyword(*ty),
        TypeSet::Multiple(types) if types.is_empty() => TsType::ANY,
        TypeSet::Multiple(types) => TsType::union(types.iter().copied().map(keyword).collect()),
    }
}

/// Literal type for an `enum`/`const` value.
pub fn literal_type(value: &Value) -> Result<TsType, GenerateError> {
    match value {
        Value::String(s) => Ok(TsType::Literal(TsLiteral::String(s.clone()))),
        Value::Number(n) => Ok(TsType::Literal(TsLiteral::Number(n.clone()))),
        Value::Bool(b) => Ok(TsType::Literal(TsLiteral::Bool(*b))),
        Value::Null => Ok(TsType::Literal(TsLiteral::Null)),
        other => Err(GenerateError::UnexpectedEnumValue(other.to_string())),
    }
}

/// Inline literal type (or union of literals) for an anonymous enum.
fn enum_literal_union(values: &[Value]) -> Result<TsType, GenerateError> {
    let members = values
        .iter()
        .map(literal_type)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TsType::union(members))
}

#[cfg(test)]
mod tests;
