use std::collections::HashSet;

use apigen_core::error::GenerateError;
use apigen_core::parse::schema::{Schema, SchemaOrRef};

use super::SchemaCompiler;

/// Which property subset a schema is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OnlyMode {
    /// Properties that are neither read-only nor write-only.
    #[default]
    None,
    /// Response side: read-only properties included, write-only excluded.
    ReadOnly,
    /// Request side: write-only properties included, read-only excluded.
    WriteOnly,
}

impl OnlyMode {
    /// Suffix appended to alias names compiled in this mode.
    pub fn suffix(&self) -> &'static str {
        match self {
            OnlyMode::None => "",
            OnlyMode::ReadOnly => "Read",
            OnlyMode::WriteOnly => "Write",
        }
    }

    /// Whether a property with the given flags belongs to this mode's subset.
    pub fn keeps(&self, flags: OnlyModeFlags) -> bool {
        match self {
            OnlyMode::ReadOnly => flags.read_only || !flags.write_only,
            OnlyMode::WriteOnly => flags.write_only || !flags.read_only,
            OnlyMode::None => !flags.read_only && !flags.write_only,
        }
    }
}

/// Whether a schema's closure contains read-only and/or write-only members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OnlyModeFlags {
    pub read_only: bool,
    pub write_only: bool,
}

impl OnlyModeFlags {
    fn both(&self) -> bool {
        self.read_only && self.write_only
    }

    fn merge(&mut self, other: OnlyModeFlags) {
        self.read_only |= other.read_only;
        self.write_only |= other.write_only;
    }
}

/// References on the current path, plus how many times the walk was cut
/// short by one of them.
#[derive(Default)]
struct Walk {
    history: HashSet<String>,
    cutoffs: usize,
}

impl SchemaCompiler<'_> {
    /// Scan a schema's closure for read-only and write-only members.
    ///
    /// With `resolve_refs` unset, references count as neither. Results for
    /// references are cached per run; a reference already on the current
    /// path counts as neither, which keeps cyclic schemas finite. A result
    /// that depended on such a cutoff is only cached once the walk is back at
    /// its root, so a partial answer never leaks to other schemas.
    pub fn check_only_mode(
        &mut self,
        schema: &SchemaOrRef,
        resolve_refs: bool,
    ) -> Result<OnlyModeFlags, GenerateError> {
        if self.options.merge_read_write_only {
            return Ok(OnlyModeFlags::default());
        }
        self.check_closure(schema, resolve_refs, &mut Walk::default())
    }

    /// [`check_only_mode`](Self::check_only_mode) for an already resolved
    /// schema, following references.
    pub fn check_schema_only_mode(&mut self, schema: &Schema) -> Result<OnlyModeFlags, GenerateError> {
        if self.options.merge_read_write_only {
            return Ok(OnlyModeFlags::default());
        }
        self.check_schema(schema, true, &mut Walk::default())
    }

    fn check_closure(
        &mut self,
        schema: &SchemaOrRef,
        resolve_refs: bool,
        walk: &mut Walk,
    ) -> Result<OnlyModeFlags, GenerateError> {
        match schema {
            SchemaOrRef::Ref { ref_path } => {
                if !resolve_refs {
                    return Ok(OnlyModeFlags::default());
                }
                if let Some(cached) = self.ctx.only_mode_cache.get(ref_path) {
                    return Ok(*cached);
                }
                if !walk.history.insert(ref_path.clone()) {
                    walk.cutoffs += 1;
                    return Ok(OnlyModeFlags::default());
                }
                let cutoffs = walk.cutoffs;
                let target: Schema = self.resolver.resolve_ref(ref_path)?;
                let flags = self.check_schema(&target, resolve_refs, walk)?;
                walk.history.remove(ref_path);
                if walk.cutoffs == cutoffs || walk.history.is_empty() {
                    self.ctx.only_mode_cache.insert(ref_path.clone(), flags);
                }
                Ok(flags)
            }
            SchemaOrRef::Schema(inline) => self.check_schema(inline, resolve_refs, walk),
        }
    }

    fn check_schema(
        &mut self,
        schema: &Schema,
        resolve_refs: bool,
        walk: &mut Walk,
    ) -> Result<OnlyModeFlags, GenerateError> {
        let mut flags = OnlyModeFlags {
            read_only: schema.is_read_only(),
            write_only: schema.is_write_only(),
        };

        let children: Vec<&SchemaOrRef> = match &schema.items {
            Some(items) => vec![items.as_ref()],
            None => schema
                .properties
                .iter()
                .flat_map(|props| props.values())
                .chain(schema.all_of.iter().flatten())
                .chain(schema.any_of.iter().flatten())
                .chain(schema.one_of.iter().flatten())
                .collect(),
        };

        for child in children {
            if flags.both() {
                break;
            }
            let child_flags = self.check_closure(child, resolve_refs, walk)?;
            flags.merge(child_flags);
        }
        Ok(flags)
    }
}
