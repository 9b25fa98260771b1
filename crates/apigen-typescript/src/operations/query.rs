use apigen_core::parse::parameter::Parameter;

/// Query-string serialization strategy, named after the runtime `QS` helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryFormatter {
    Form,
    Deep,
    Explode,
    Space,
    Pipe,
    Json,
}

impl QueryFormatter {
    /// Select the formatter from a parameter's `content`, `style` and `explode`.
    ///
    /// `explode` defaults to false, so a bare parameter serializes with `form`.
    pub fn for_parameter(param: &Parameter) -> Self {
        if param.has_content() {
            return QueryFormatter::Json;
        }
        let explode = param.explode.unwrap_or(false);
        match param.style.as_deref() {
            Some("deepObject") if explode => QueryFormatter::Deep,
            _ if explode => QueryFormatter::Explode,
            Some("spaceDelimited") => QueryFormatter::Space,
            Some("pipeDelimited") => QueryFormatter::Pipe,
            _ => QueryFormatter::Form,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryFormatter::Form => "form",
            QueryFormatter::Deep => "deep",
            QueryFormatter::Explode => "explode",
            QueryFormatter::Space => "space",
            QueryFormatter::Pipe => "pipe",
            QueryFormatter::Json => "json",
        }
    }
}
