use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::document::OpenApiSpec;
use crate::error::ResolveError;

/// A node that is either an inline object or a `$ref` pointing at one.
pub trait MaybeRef {
    type Target: DeserializeOwned + Clone;

    fn ref_path(&self) -> Option<&str>;

    fn inline(&self) -> Option<&Self::Target>;
}

/// Resolves in-document `$ref` pointers against a JSON snapshot of the document.
///
/// Only pointers rooted at `#/` are supported; anything else is an external
/// reference and fails with [`ResolveError::UnsupportedReference`].
#[derive(Debug, Clone)]
pub struct RefResolver {
    root: Value,
}

impl RefResolver {
    pub fn new(spec: &OpenApiSpec) -> Result<Self, ResolveError> {
        let root = serde_json::to_value(spec).map_err(ResolveError::Snapshot)?;
        Ok(Self { root })
    }

    /// Return the inline object, or look up and decode the referenced one.
    pub fn resolve<'a, R: MaybeRef>(
        &self,
        item: &'a R,
    ) -> Result<Cow<'a, R::Target>, ResolveError> {
        match item.inline() {
            Some(inline) => Ok(Cow::Borrowed(inline)),
            None => self
                .resolve_ref(item.ref_path().unwrap_or_default())
                .map(Cow::Owned),
        }
    }

    /// Resolve every element of a sequence; absent input yields an empty list.
    pub fn resolve_array<'a, R: MaybeRef>(
        &self,
        items: Option<&'a [R]>,
    ) -> Result<Vec<Cow<'a, R::Target>>, ResolveError> {
        items
            .unwrap_or_default()
            .iter()
            .map(|item| self.resolve(item))
            .collect()
    }

    /// Decode the object at `reference` as `T`.
    pub fn resolve_ref<T: DeserializeOwned>(&self, reference: &str) -> Result<T, ResolveError> {
        let node = self.lookup(reference)?;
        T::deserialize(node).map_err(|source| ResolveError::InvalidTarget {
            reference: reference.to_string(),
            source,
        })
    }

    /// Whether `reference` points at an existing node.
    pub fn contains(&self, reference: &str) -> bool {
        self.lookup(reference).is_ok()
    }

    fn lookup(&self, reference: &str) -> Result<&Value, ResolveError> {
        let segments = pointer_segments(reference)?;
        let mut node = &self.root;
        for segment in &segments {
            let next = match node {
                Value::Object(map) => map.get(segment.as_str()),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            node = next.ok_or_else(|| ResolveError::ReferenceNotFound(reference.to_string()))?;
        }
        Ok(node)
    }
}

/// Split an in-document reference into decoded path segments.
///
/// `~1` decodes to `/` and `~0` to `~`; percent escapes are decoded after that.
pub fn pointer_segments(reference: &str) -> Result<Vec<String>, ResolveError> {
    let path = reference
        .strip_prefix("#/")
        .ok_or_else(|| ResolveError::UnsupportedReference(reference.to_string()))?;
    Ok(path
        .split('/')
        .map(|s| percent_decode(&s.replace("~1", "/").replace("~0", "~")))
        .collect())
}

fn percent_decode(segment: &str) -> String {
    if !segment.contains('%') {
        return segment.to_string();
    }
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escaped = match bytes[i] {
            b'%' => segment
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok()),
            _ => None,
        };
        match escaped {
            Some(byte) => {
                out.push(byte);
                i += 3;
            }
            None => {
                out.push(bytes[i]);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
