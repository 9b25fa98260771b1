pub mod config;
pub mod error;
pub mod parse;
pub mod transform;

use parse::OpenApiSpec;

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for code generators that produce files from a parsed OpenAPI document.
///
/// The document is treated as immutable input; generators that need to
/// normalize it work on their own copy.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;
    fn generate(
        &self,
        spec: &OpenApiSpec,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
