use heck::ToLowerCamelCase;

/// Camel-case an arbitrary string.
///
/// Word boundaries fall on separators, case changes and letter/digit
/// transitions, so `10percent` becomes `10Percent` and `get /pets/by id`
/// becomes `getPetsById`.
pub fn camel_case(input: &str) -> String {
    split_digit_runs(input).to_lower_camel_case()
}

/// Uppercase the first character, leaving the rest untouched.
pub fn upper_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The last path segment of a reference.
pub fn ref_basename(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// A display name for a reference: its basename, or the whole pointer without
/// leading punctuation when the basename starts with a digit.
pub fn ref_name(reference: &str) -> String {
    let base = ref_basename(reference);
    if base.starts_with(|c: char| c.is_ascii_digit()) {
        reference
            .trim_start_matches(|c: char| !(c.is_alphanumeric() || c == '_'))
            .to_string()
    } else {
        base.to_string()
    }
}

/// Derive a camelCase operation name from HTTP method + path.
///
/// The first path parameter reads as `by <name>` and the second as
/// `and <name>`:
/// - `GET /pets` → `getPets`
/// - `GET /pets/{petId}` → `getPetsByPetId`
/// - `DELETE /users/{userId}/pets/{petId}` → `deleteUsersByUserIdPetsAndPetId`
pub fn route_name(method: &str, path: &str) -> String {
    let path = replace_param(path, "by");
    let path = replace_param(&path, "and");
    camel_case(&format!("{} {}", method.to_lowercase(), path))
}

/// Escape a component name for use as a JSON-pointer segment.
pub fn pointer_escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn replace_param(path: &str, word: &str) -> String {
    let Some(open) = path.find('{') else {
        return path.to_string();
    };
    match path[open + 1..].find('}') {
        Some(len) if len > 0 => {
            let name = &path[open + 1..open + 1 + len];
            format!("{}{word} {name}{}", &path[..open], &path[open + len + 2..])
        }
        _ => path.to_string(),
    }
}

fn split_digit_runs(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev: Option<char> = None;
    for ch in input.chars() {
        if let Some(p) = prev {
            let boundary = (p.is_ascii_digit() && ch.is_alphabetic())
                || (p.is_alphabetic() && ch.is_ascii_digit());
            if boundary {
                out.push(' ');
            }
        }
        out.push(ch);
        prev = Some(ch);
    }
    out
}
