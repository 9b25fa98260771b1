use std::collections::{HashMap, HashSet};

use crate::ast::{Declaration, TsType};
use crate::compiler::{OnlyMode, OnlyModeFlags};
use crate::identifier::IdentifierAllocator;

/// Names allocated for one reference: the base alias plus optional
/// read/write variants.
#[derive(Debug, Clone)]
pub struct RefAliases {
    pub base: String,
    pub read_only: Option<String>,
    pub write_only: Option<String>,
}

impl RefAliases {
    pub fn get(&self, mode: OnlyMode) -> &str {
        let variant = match mode {
            OnlyMode::None => None,
            OnlyMode::ReadOnly => self.read_only.as_deref(),
            OnlyMode::WriteOnly => self.write_only.as_deref(),
        };
        variant.unwrap_or(&self.base)
    }
}

/// A named enum already emitted for a proposed name.
#[derive(Debug, Clone)]
pub struct EnumEntry {
    pub signature: String,
    pub ty: TsType,
}

/// Mutable tables for one generation run.
///
/// A fresh context is created for every run, so nothing leaks between
/// documents generated by the same process.
#[derive(Debug, Default)]
pub struct GenerationContext {
    /// Canonical references of discriminating base schemas.
    pub discriminating: HashSet<String>,
    pub refs: HashMap<String, RefAliases>,
    pub identifiers: IdentifierAllocator,
    pub enums: HashMap<String, EnumEntry>,
    pub only_mode_cache: HashMap<String, OnlyModeFlags>,
    pub operation_names: HashMap<String, usize>,
    /// Pending type alias declarations, in allocation order.
    pub aliases: Vec<Declaration>,
    /// Pending enum declarations, in allocation order.
    pub enum_decls: Vec<Declaration>,
}

impl GenerationContext {
    pub fn new(discriminating: HashSet<String>) -> Self {
        Self {
            discriminating,
            ..Default::default()
        }
    }

    /// Reserve an operation name; repeats get their occurrence count appended,
    /// skipping counts whose suffixed name is already taken.
    pub fn operation_name(&mut self, name: String) -> String {
        let mut count = self.operation_names.get(&name).copied().unwrap_or(0);
        let unique = loop {
            count += 1;
            let candidate = if count > 1 {
                format!("{name}{count}")
            } else {
                name.clone()
            };
            if !self.operation_names.contains_key(&candidate) {
                break candidate;
            }
        };
        if count > 1 {
            log::debug!("operation name {name} collides, using {unique}");
            self.operation_names.insert(unique.clone(), 1);
        }
        self.operation_names.insert(name, count);
        unique
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_name_collisions() {
        let mut ctx = GenerationContext::default();
        assert_eq!(ctx.operation_name("getPets".into()), "getPets");
        assert_eq!(ctx.operation_name("getPets".into()), "getPets2");
        assert_eq!(ctx.operation_name("getPets".into()), "getPets3");
        assert_eq!(ctx.operation_name("listPets".into()), "listPets");
    }

    #[test]
    fn test_suffixed_operation_names_are_reserved() {
        let mut ctx = GenerationContext::default();
        assert_eq!(ctx.operation_name("getPets2".into()), "getPets2");
        assert_eq!(ctx.operation_name("getPets".into()), "getPets");
        assert_eq!(ctx.operation_name("getPets".into()), "getPets3");
        assert_eq!(ctx.operation_name("getPets2".into()), "getPets22");
    }

    #[test]
    fn test_ref_aliases_fall_back_to_base() {
        let aliases = RefAliases {
            base: "Pet".into(),
            read_only: Some("PetRead".into()),
            write_only: None,
        };
        assert_eq!(aliases.get(OnlyMode::None), "Pet");
        assert_eq!(aliases.get(OnlyMode::ReadOnly), "PetRead");
        assert_eq!(aliases.get(OnlyMode::WriteOnly), "Pet");
    }
}
