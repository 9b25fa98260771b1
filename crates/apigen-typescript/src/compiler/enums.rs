use serde_json::Value;

use apigen_core::error::GenerateError;
use apigen_core::parse::schema::{Schema, SchemaType};
use apigen_core::transform::name_normalizer::upper_first;

use super::{OnlyMode, SchemaCompiler};
use crate::ast::{Declaration, EnumMember, TsLiteral, TsType};
use crate::context::EnumEntry;
use crate::identifier::to_identifier;

impl SchemaCompiler<'_> {
    /// Whether an enum schema reachable under `name` becomes a named `enum`.
    pub(super) fn is_true_enum(&self, schema: &Schema, name: &str) -> bool {
        self.options.use_enum_type
            && !name.is_empty()
            && schema.enum_list().is_some()
            && !schema
                .schema_type
                .as_ref()
                .is_some_and(|t| t.is(SchemaType::Boolean))
    }

    /// Emit (or reuse) a named enum declaration.
    ///
    /// The registry is keyed by the proposed name. A schema proposing a name
    /// whose entry has the same ordered values reuses that declaration;
    /// different values get a freshly allocated, suffixed name, which then
    /// replaces the entry.
    pub(super) fn true_enum(&mut self, schema: &Schema, name: &str) -> Result<TsType, GenerateError> {
        let base = schema
            .title
            .clone()
            .unwrap_or_else(|| upper_first(name));
        let proposed = proposed_enum_name(&base);
        let values = schema.enum_list().unwrap_or_default();
        let signature = enum_signature(values)?;

        if let Some(entry) = self.ctx.enums.get(&proposed)
            && entry.signature == signature
        {
            log::debug!("reusing enum {proposed}");
            return Ok(entry.ty.clone());
        }

        let enum_name = self.ctx.identifiers.unique(&proposed);
        let custom_names = schema.enum_member_names();
        if let Some(names) = custom_names
            && names.len() != values.len()
        {
            return Err(GenerateError::EnumNames {
                name: enum_name,
                expected: values.len(),
                found: names.len(),
            });
        }

        let mut members = Vec::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            let custom = custom_names.map(|names| names[index].as_str());
            let (label, literal) = match value {
                Value::String(s) => (custom.unwrap_or(s).to_string(), TsLiteral::String(s.clone())),
                Value::Number(n) => (
                    custom.map(str::to_string).unwrap_or_else(|| n.to_string()),
                    TsLiteral::Number(n.clone()),
                ),
                other => return Err(GenerateError::UnexpectedEnumValue(other.to_string())),
            };
            members.push(EnumMember {
                name: to_identifier(&label, true, OnlyMode::None),
                value: literal,
            });
        }

        log::debug!("enum {enum_name} for {proposed}");
        self.ctx.enum_decls.push(Declaration::Enum {
            name: enum_name.clone(),
            members,
        });
        let ty = TsType::Ref(enum_name);
        self.ctx.enums.insert(
            proposed,
            EnumEntry {
                signature,
                ty: ty.clone(),
            },
        );
        Ok(ty)
    }
}

/// `"order status"` → `"OrderStatus"`; `$` and `_` are kept.
fn proposed_enum_name(base: &str) -> String {
    base.split(|c: char| !(c.is_ascii_alphanumeric() || c == '$' || c == '_'))
        .map(upper_first)
        .collect()
}

/// Ordered, human-readable signature of an enum's values.
fn enum_signature(values: &[Value]) -> Result<String, GenerateError> {
    let parts = values
        .iter()
        .map(|value| match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Ok(String::new()),
            other => Err(GenerateError::UnexpectedEnumValue(other.to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join("_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_proposed_enum_name() {
        assert_eq!(proposed_enum_name("Status"), "Status");
        assert_eq!(proposed_enum_name("order status"), "OrderStatus");
        assert_eq!(proposed_enum_name("pet-kind_v2"), "PetKind_v2");
    }

    #[test]
    fn test_enum_signature() {
        let values = vec![json!("a"), json!(1), json!(true), json!(null)];
        assert_eq!(enum_signature(&values).unwrap(), "a_1_true_");
        let err = enum_signature(&[json!({"a": 1})]).unwrap_err();
        assert!(matches!(err, GenerateError::UnexpectedEnumValue(_)));
    }
}
