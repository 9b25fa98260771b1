use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("external references are not supported ({0}); bundle the document first")]
    UnsupportedReference(String),

    #[error("reference target not found: {0}")]
    ReferenceNotFound(String),

    #[error("reference {reference} does not point at the expected object: {source}")]
    InvalidTarget {
        reference: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to index document for reference lookup: {0}")]
    Snapshot(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("invalid discriminator: {0}")]
    DiscriminatorConfig(String),

    #[error("unexpected enum value {0}")]
    UnexpectedEnumValue(String),

    #[error("enum {name} has {found} custom member names but {expected} values")]
    EnumNames {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("template render failed: {0}")]
    Render(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
