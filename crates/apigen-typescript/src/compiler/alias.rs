use apigen_core::error::GenerateError;
use apigen_core::parse::schema::Schema;
use apigen_core::transform::name_normalizer::ref_name;

use super::{OnlyMode, SchemaCompiler};
use crate::ast::{Declaration, TsType};
use crate::context::RefAliases;
use crate::identifier::to_identifier;

impl SchemaCompiler<'_> {
    /// Type reference for `reference` under `mode`, allocating on first visit.
    ///
    /// The base alias is registered before its body is compiled, so a schema
    /// that reaches itself again resolves to the alias instead of recursing.
    /// Read/Write variants are emitted alongside the base when the schema's
    /// closure contains read-only or write-only members.
    ///
    /// With `ignore_discriminator`, the schema is compiled without its
    /// discriminator under a synthetic `<ref>Base` key.
    pub fn ref_alias(
        &mut self,
        reference: &str,
        mode: OnlyMode,
        ignore_discriminator: bool,
    ) -> Result<TsType, GenerateError> {
        let key = if ignore_discriminator {
            self.find_available_ref(&format!("{reference}Base"))
        } else {
            reference.to_string()
        };
        if let Some(aliases) = self.ctx.refs.get(&key) {
            return Ok(TsType::Ref(aliases.get(mode).to_string()));
        }

        let mut schema: Schema = self.resolver.resolve_ref(reference)?;
        if ignore_discriminator {
            schema.discriminator = None;
        }
        let name = schema.title.clone().unwrap_or_else(|| ref_name(&key));

        if self.is_true_enum(&schema, &name) {
            return self.true_enum(&schema, &name);
        }

        let alias = self
            .ctx
            .identifiers
            .unique(&to_identifier(&name, true, OnlyMode::None));
        log::debug!("alias {alias} for {key}");
        self.ctx.refs.insert(
            key.clone(),
            RefAliases {
                base: alias.clone(),
                read_only: None,
                write_only: None,
            },
        );

        let ty = self.inline_type(&schema, None, OnlyMode::None)?;
        self.ctx.aliases.push(Declaration::TypeAlias {
            name: alias.clone(),
            ty,
        });

        let flags = self.check_schema_only_mode(&schema)?;
        for (present, variant_mode) in [
            (flags.read_only, OnlyMode::ReadOnly),
            (flags.write_only, OnlyMode::WriteOnly),
        ] {
            if !present {
                continue;
            }
            let variant = self
                .ctx
                .identifiers
                .unique(&to_identifier(&name, true, variant_mode));
            log::debug!("alias {variant} for {key} ({variant_mode:?})");
            if let Some(entry) = self.ctx.refs.get_mut(&key) {
                match variant_mode {
                    OnlyMode::ReadOnly => entry.read_only = Some(variant.clone()),
                    OnlyMode::WriteOnly => entry.write_only = Some(variant.clone()),
                    OnlyMode::None => {}
                }
            }
            let ty = self.inline_type(&schema, None, variant_mode)?;
            self.ctx.aliases.push(Declaration::TypeAlias { name: variant, ty });
        }

        let resolved = self
            .ctx
            .refs
            .get(&key)
            .map(|aliases| aliases.get(mode).to_string())
            .unwrap_or(alias);
        Ok(TsType::Ref(resolved))
    }

    /// `reference` itself if nothing in the document lives there, otherwise
    /// the first `reference2`, `reference3`, ... that is free.
    fn find_available_ref(&self, reference: &str) -> String {
        if !self.resolver.contains(reference) {
            return reference.to_string();
        }
        (2..)
            .map(|i| format!("{reference}{i}"))
            .find(|candidate| !self.resolver.contains(candidate))
            .unwrap_or_else(|| reference.to_string())
    }
}
