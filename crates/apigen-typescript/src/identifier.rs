use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use apigen_core::transform::name_normalizer::{camel_case, upper_first};

use crate::compiler::OnlyMode;

/// Words that cannot be used as binding names in TypeScript.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "implements",
        "interface",
        "let",
        "package",
        "private",
        "protected",
        "public",
        "static",
        "yield",
        "await",
    ]
    .into_iter()
    .collect()
});

/// Whether `s` is a legal, non-reserved TypeScript identifier.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let starts = first == '_' || first == '$' || first.is_alphabetic();
    starts
        && chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
        && !TS_RESERVED_WORDS.contains(s)
}

/// Turn an arbitrary string into an identifier.
///
/// The input is camel-cased, optionally upper-cased on its first letter and
/// suffixed with `Read`/`Write` for the given mode. Anything still illegal is
/// prefixed with `$`.
pub fn to_identifier(s: &str, upper: bool, mode: OnlyMode) -> String {
    let mut cc = camel_case(s);
    if upper {
        cc = upper_first(&cc);
    }
    cc.push_str(mode.suffix());
    if is_valid_identifier(&cc) {
        cc
    } else {
        format!("${cc}")
    }
}

/// Property key as written in an object type or literal, quoted when needed.
pub fn property_key(name: &str) -> String {
    let plain = name.chars().next().is_some_and(|c| !c.is_ascii_digit())
        && name.chars().all(|c| c == '_' || c == '$' || c.is_alphanumeric());
    if plain {
        name.to_string()
    } else {
        serde_json::Value::String(name.to_string()).to_string()
    }
}

/// Allocates collision-free type names.
///
/// The first request for a name returns it unchanged; later requests get the
/// running count appended (`Category`, `Category2`, ...). Suffixed names are
/// themselves recorded as used.
#[derive(Debug, Default)]
pub struct IdentifierAllocator {
    used: HashMap<String, usize>,
}

impl IdentifierAllocator {
    pub fn unique(&mut self, name: &str) -> String {
        let mut name = name.to_string();
        if let Some(count) = self.used.get_mut(&name) {
            *count += 1;
            name = format!("{name}{count}");
        }
        self.used.insert(name.clone(), 1);
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(is_valid_identifier("pet"));
        assert!(is_valid_identifier("$ref"));
        assert!(is_valid_identifier("_x1"));
        assert!(!is_valid_identifier("0limit"));
        assert!(!is_valid_identifier("delete"));
        assert!(!is_valid_identifier("a-b"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn test_to_identifier() {
        assert_eq!(to_identifier("pet-id", false, OnlyMode::None), "petId");
        assert_eq!(to_identifier("0 limit", false, OnlyMode::None), "$0Limit");
        assert_eq!(to_identifier("delete", false, OnlyMode::None), "$delete");
        assert_eq!(to_identifier("10percent", true, OnlyMode::None), "$10Percent");
        assert_eq!(to_identifier("pet", true, OnlyMode::ReadOnly), "PetRead");
        assert_eq!(to_identifier("pet", true, OnlyMode::WriteOnly), "PetWrite");
    }

    #[test]
    fn test_property_key() {
        assert_eq!(property_key("name"), "name");
        assert_eq!(property_key("read_only_prop"), "read_only_prop");
        assert_eq!(property_key("x-request-id"), "\"x-request-id\"");
        assert_eq!(property_key("2xx"), "\"2xx\"");
        assert_eq!(property_key(""), "\"\"");
    }

    #[test]
    fn test_allocator_suffixes() {
        let mut ids = IdentifierAllocator::default();
        assert_eq!(ids.unique("Category"), "Category");
        assert_eq!(ids.unique("Category"), "Category2");
        assert_eq!(ids.unique("Category"), "Category3");
        assert_eq!(ids.unique("Category2"), "Category22");
        assert_eq!(ids.unique("Pet"), "Pet");
    }
}
